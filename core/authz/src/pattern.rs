// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

//! Matchers over fully qualified `Service/Method` names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::PatternError;

/// Token matching any single segment, or any method when used alone.
pub const WILDCARD: &str = "*";

/// Separator between the service and the method name.
pub const SEPARATOR: char = '/';

/// Suffix of the dotted service form, `Service.*`.
const SERVICE_WILDCARD_SUFFIX: &str = ".*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Any,
    Exact(String),
}

impl Segment {
    fn parse(segment: &str) -> Self {
        if segment == WILDCARD {
            Segment::Any
        } else {
            Segment::Exact(segment.to_string())
        }
    }

    fn matches(&self, segment: &str) -> bool {
        match self {
            Segment::Any => true,
            Segment::Exact(expected) => expected == segment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// `*`: matches every method, malformed ones included.
    Any,
    /// `Service/Method` where each side may be `*`.
    Qualified { service: Segment, method: Segment },
    /// Anything else. Kept so the table can be built, but it never matches.
    Unmatchable,
}

/// A matcher over a two-part method identifier `Service/Method`.
///
/// Supported forms:
/// - `Service/Method`: exact match
/// - `Service/*` or `*/Method`: one wildcard segment
/// - `Service.*`: same as `Service/*`
/// - `*`: any method
///
/// Matching is case-sensitive and performs no normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MethodPattern {
    raw: String,
    kind: Kind,
}

impl MethodPattern {
    /// Parse a pattern. Fails only if the pattern is empty.
    pub fn new(pattern: impl Into<String>) -> Result<Self, PatternError> {
        let raw = pattern.into();
        if raw.is_empty() {
            return Err(PatternError::Empty);
        }

        let kind = if raw == WILDCARD {
            Kind::Any
        } else if let Some(service) = dotted_service(&raw) {
            Kind::Qualified {
                service: Segment::parse(service),
                method: Segment::Any,
            }
        } else {
            match split_method(&raw) {
                Some((service, method)) => Kind::Qualified {
                    service: Segment::parse(service),
                    method: Segment::parse(method),
                },
                None => Kind::Unmatchable,
            }
        };

        Ok(Self { raw, kind })
    }

    /// The pattern as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True if this pattern matches every method.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, Kind::Any)
    }

    /// True if some well-formed `Service/Method` can match this pattern.
    pub fn can_match(&self) -> bool {
        !matches!(self.kind, Kind::Unmatchable)
    }

    /// Check whether `method` is matched by this pattern.
    pub fn matches(&self, method: &str) -> bool {
        match &self.kind {
            Kind::Any => true,
            Kind::Qualified {
                service,
                method: name,
            } => match split_method(method) {
                Some((s, m)) => service.matches(s) && name.matches(m),
                None => false,
            },
            Kind::Unmatchable => false,
        }
    }
}

/// Split `Service/Method` into its two segments. Returns `None` unless the
/// input contains exactly one separator.
fn split_method(method: &str) -> Option<(&str, &str)> {
    let (service, name) = method.split_once(SEPARATOR)?;
    if name.contains(SEPARATOR) {
        return None;
    }
    Some((service, name))
}

/// Service name of a `Service.*` pattern.
fn dotted_service(pattern: &str) -> Option<&str> {
    let service = pattern.strip_suffix(SERVICE_WILDCARD_SUFFIX)?;
    if service.is_empty() || service.contains(SEPARATOR) {
        return None;
    }
    Some(service)
}

impl fmt::Display for MethodPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for MethodPattern {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MethodPattern::new(value)
    }
}

impl TryFrom<&str> for MethodPattern {
    type Error = PatternError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        MethodPattern::new(value)
    }
}

impl From<MethodPattern> for String {
    fn from(pattern: MethodPattern) -> Self {
        pattern.raw
    }
}
