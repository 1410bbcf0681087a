// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

//! Resolution of the calling principal from request metadata.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderName};
use rpc_authz::Principal;
use rpc_authz::config::{self, Configuration};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ResolverConfigError;

/// Turns request metadata into an authenticated principal.
///
/// Returning `None` marks the call as anonymous: the rule table then
/// decides whether anonymous access is allowed.
pub trait PrincipalResolver: Send + Sync + 'static {
    fn resolve(&self, headers: &HeaderMap) -> Option<Principal>;
}

impl<F> PrincipalResolver for F
where
    F: Fn(&HeaderMap) -> Option<Principal> + Send + Sync + 'static,
{
    fn resolve(&self, headers: &HeaderMap) -> Option<Principal> {
        self(headers)
    }
}

/// String whose content never shows up in logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct OpaqueString(String);

impl OpaqueString {
    pub fn new(value: impl Into<String>) -> Self {
        OpaqueString(value.into())
    }
}

impl AsRef<str> for OpaqueString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OpaqueString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpaqueString(****)")
    }
}

/// A token and the principal it authenticates.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct TokenConfig {
    /// The token presented by the client.
    pub token: OpaqueString,

    /// Identifier of the principal.
    pub id: String,

    /// Authorities granted to the principal.
    #[serde(default)]
    pub authorities: Vec<String>,
}

impl TokenConfig {
    pub fn new<I, A>(token: &str, id: &str, authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        TokenConfig {
            token: OpaqueString::new(token),
            id: id.to_string(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }
}

/// Configuration of a [`StaticTokenResolver`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct StaticTokenConfig {
    /// Metadata key carrying the token.
    #[serde(default = "default_header")]
    pub header: String,

    /// Prefix stripped from the header value before lookup.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Known tokens.
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

impl Default for StaticTokenConfig {
    fn default() -> Self {
        StaticTokenConfig {
            header: default_header(),
            prefix: default_prefix(),
            tokens: Vec::new(),
        }
    }
}

fn default_header() -> String {
    AUTHORIZATION.as_str().to_string()
}

fn default_prefix() -> String {
    "Bearer ".to_string()
}

impl StaticTokenConfig {
    pub fn with_token(mut self, token: TokenConfig) -> Self {
        self.tokens.push(token);
        self
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ResolverConfigError> {
        let config: Self = config::from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

impl Configuration for StaticTokenConfig {
    type Error = ResolverConfigError;

    fn validate(&self) -> Result<(), Self::Error> {
        HeaderName::from_bytes(self.header.as_bytes())?;

        for (index, token) in self.tokens.iter().enumerate() {
            if token.token.as_ref().is_empty() {
                return Err(ResolverConfigError::EmptyToken { index });
            }
            if self.tokens[..index].iter().any(|t| t.token == token.token) {
                return Err(ResolverConfigError::DuplicateToken { index });
            }
        }

        Ok(())
    }
}

/// Resolves principals from a fixed table of opaque tokens.
///
/// Useful for service-to-service credentials and tests. Unknown or missing
/// tokens resolve to no principal.
#[derive(Clone)]
pub struct StaticTokenResolver {
    header: HeaderName,
    prefix: String,
    principals: HashMap<String, Principal>,
}

impl StaticTokenResolver {
    pub fn from_config(config: &StaticTokenConfig) -> Result<Self, ResolverConfigError> {
        config.validate()?;

        let principals = config
            .tokens
            .iter()
            .map(|t| {
                (
                    t.token.as_ref().to_string(),
                    Principal::new(t.id.as_str()).with_authorities(t.authorities.iter().cloned()),
                )
            })
            .collect();

        Ok(StaticTokenResolver {
            header: HeaderName::from_bytes(config.header.as_bytes())?,
            prefix: config.prefix.clone(),
            principals,
        })
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

impl fmt::Debug for StaticTokenResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenResolver")
            .field("header", &self.header)
            .field("prefix", &self.prefix)
            .field("tokens", &self.principals.len())
            .finish()
    }
}

impl PrincipalResolver for StaticTokenResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<Principal> {
        let value = headers.get(&self.header)?.to_str().ok()?;
        let token = match value.strip_prefix(self.prefix.as_str()) {
            Some(token) => token,
            None => {
                debug!(header = %self.header, "token does not carry the expected prefix");
                return None;
            }
        };

        let principal = self.principals.get(token).cloned();
        if principal.is_none() {
            debug!(header = %self.header, "unknown token");
        }

        principal
    }
}
