// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An authenticated identity together with the authorities granted to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Principal {
    /// Identifier of the caller (subject, client id, ...)
    id: String,

    /// Granted authorities (scopes, roles, permissions)
    #[serde(default)]
    authorities: BTreeSet<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            authorities: BTreeSet::new(),
        }
    }

    pub fn with_authorities<I, A>(self, authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Principal {
            authorities: authorities.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authorities.insert(authority.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn authorities(&self) -> &BTreeSet<String> {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    pub fn has_any_authority<S: AsRef<str>>(&self, authorities: &[S]) -> bool {
        authorities.iter().any(|a| self.has_authority(a.as_ref()))
    }
}
