// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use crate::principal::Principal;
use crate::table::{Rule, RuleTable};

/// Outcome of an authorization evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => f.write_str("allow"),
            Decision::Deny => f.write_str("deny"),
        }
    }
}

/// Decide whether a call to `method` made by `principal` is authorized.
///
/// The first rule whose pattern matches `method` decides. If no rule
/// matches the call is denied.
pub fn evaluate(table: &RuleTable, method: &str, principal: Option<&Principal>) -> Decision {
    evaluate_with_rule(table, method, principal).0
}

/// Like [`evaluate`], also returning the rule that decided, if any.
pub fn evaluate_with_rule<'a>(
    table: &'a RuleTable,
    method: &str,
    principal: Option<&Principal>,
) -> (Decision, Option<&'a Rule>) {
    match table.matching_rule(method) {
        Some(rule) => (rule.requirement().check(principal), Some(rule)),
        None => (Decision::Deny, None),
    }
}
