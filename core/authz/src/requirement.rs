// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::evaluator::Decision;
use crate::principal::Principal;

/// What a call must satisfy once its method matched a rule.
///
/// In YAML the unit variants are plain strings (`permit_all`,
/// `authenticated`, ...) and the others single-key maps
/// (`{ has_authority: SCOPE_profile }`). Fields of this type must be
/// annotated with `serde_yaml::with::singleton_map` for that form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Always allow.
    PermitAll,
    /// Always deny.
    DenyAll,
    /// Allow iff a principal is present.
    Authenticated,
    /// Allow iff a principal is present and holds the authority.
    HasAuthority(String),
    /// Allow iff a principal is present and holds at least one of the authorities.
    HasAnyAuthority(Vec<String>),
}

impl Requirement {
    pub fn has_authority(authority: impl Into<String>) -> Self {
        Requirement::HasAuthority(authority.into())
    }

    pub fn has_any_authority<I, A>(authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Requirement::HasAnyAuthority(authorities.into_iter().map(Into::into).collect())
    }

    /// Evaluate the requirement against an optional principal.
    pub fn check(&self, principal: Option<&Principal>) -> Decision {
        let allowed = match (self, principal) {
            (Requirement::PermitAll, _) => true,
            (Requirement::DenyAll, _) => false,
            (_, None) => false,
            (Requirement::Authenticated, Some(_)) => true,
            (Requirement::HasAuthority(authority), Some(p)) => p.has_authority(authority),
            (Requirement::HasAnyAuthority(authorities), Some(p)) => {
                p.has_any_authority(authorities.as_slice())
            }
        };

        Decision::from(allowed)
    }
}
