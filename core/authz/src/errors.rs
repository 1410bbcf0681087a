// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors raised while building or loading an authorization policy.
/// These only happen at startup: evaluation itself never fails.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("rule {index}: method pattern must not be empty")]
    EmptyPattern { index: usize },

    #[error("invalid deadline: {0}")]
    InvalidDeadline(String),

    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Error returned when parsing a single method pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("method pattern must not be empty")]
    Empty,
}
