// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

//! Ordered rule tables and their builder.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AuthorizationConfig;
use crate::errors::ConfigurationError;
use crate::evaluator::{self, Decision};
use crate::pattern::MethodPattern;
use crate::principal::Principal;
use crate::requirement::Requirement;

/// A method pattern paired with the requirement applied to matching calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pattern: MethodPattern,
    requirement: Requirement,
}

impl Rule {
    pub fn new(pattern: MethodPattern, requirement: Requirement) -> Self {
        Self {
            pattern,
            requirement,
        }
    }

    pub fn pattern(&self) -> &MethodPattern {
        &self.pattern
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }
}

/// Immutable, ordered list of rules.
///
/// Rules are checked in insertion order and the first match decides.
/// Methods matched by no rule are denied.
///
/// Serialized in the same form as [`AuthorizationConfig`]. Deserialization
/// goes through [`RuleTableBuilder::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AuthorizationConfig", into = "AuthorizationConfig")]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::new()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule matching `method`, if any.
    pub fn matching_rule(&self, method: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.pattern.matches(method))
    }

    /// Shorthand for [`evaluator::evaluate`].
    pub fn evaluate(&self, method: &str, principal: Option<&Principal>) -> Decision {
        evaluator::evaluate(self, method, principal)
    }

    /// Shorthand for [`evaluator::evaluate_with_rule`].
    pub fn evaluate_with_rule(
        &self,
        method: &str,
        principal: Option<&Principal>,
    ) -> (Decision, Option<&Rule>) {
        evaluator::evaluate_with_rule(self, method, principal)
    }
}

impl TryFrom<AuthorizationConfig> for RuleTable {
    type Error = ConfigurationError;

    fn try_from(config: AuthorizationConfig) -> Result<Self, Self::Error> {
        config.to_rule_table()
    }
}

/// Accumulates rules in order and freezes them into a [`RuleTable`].
///
/// Patterns are only validated by [`RuleTableBuilder::build`], so the
/// builder can be chained without intermediate error handling.
#[derive(Debug, Clone, Default)]
pub struct RuleTableBuilder {
    rules: Vec<(String, Requirement)>,
}

impl RuleTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Earlier rules take precedence over later ones.
    pub fn add_rule(mut self, pattern: impl Into<String>, requirement: Requirement) -> Self {
        self.rules.push((pattern.into(), requirement));
        self
    }

    pub fn permit_all(self, pattern: impl Into<String>) -> Self {
        self.add_rule(pattern, Requirement::PermitAll)
    }

    pub fn deny_all(self, pattern: impl Into<String>) -> Self {
        self.add_rule(pattern, Requirement::DenyAll)
    }

    pub fn authenticated(self, pattern: impl Into<String>) -> Self {
        self.add_rule(pattern, Requirement::Authenticated)
    }

    pub fn has_authority(self, pattern: impl Into<String>, authority: impl Into<String>) -> Self {
        self.add_rule(pattern, Requirement::has_authority(authority))
    }

    pub fn has_any_authority<I, A>(self, pattern: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.add_rule(pattern, Requirement::has_any_authority(authorities))
    }

    /// Freeze the accumulated rules.
    ///
    /// Fails if any pattern is empty. A builder with no rules yields a
    /// table that denies every call.
    pub fn build(self) -> Result<RuleTable, ConfigurationError> {
        let rules = self
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, (pattern, requirement))| -> Result<Rule, ConfigurationError> {
                let pattern = MethodPattern::new(pattern)
                    .map_err(|_| ConfigurationError::EmptyPattern { index })?;

                if !pattern.can_match() {
                    warn!(
                        %index,
                        pattern = %pattern,
                        "method pattern is not '*' nor 'Service/Method': rule will never match"
                    );
                }

                Ok(Rule::new(pattern, requirement))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RuleTable { rules })
    }
}
