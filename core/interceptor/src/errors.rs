// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

use rpc_authz::ConfigurationError;
use thiserror::Error;

/// Errors raised while configuring a principal resolver.
#[derive(Error, Debug)]
pub enum ResolverConfigError {
    #[error("token {index}: token must not be empty")]
    EmptyToken { index: usize },

    #[error("token {index}: token already configured")]
    DuplicateToken { index: usize },

    #[error("invalid header name: {0}")]
    HeaderName(#[from] http::header::InvalidHeaderName),

    #[error("config error: {0}")]
    Config(#[from] ConfigurationError),
}

/// Errors decoding a `grpc-timeout` header value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeoutError {
    #[error("empty timeout value")]
    Empty,

    #[error("timeout value has {0} digits, at most 8 are allowed")]
    TooLong(usize),

    #[error("invalid timeout value: {0}")]
    InvalidValue(String),

    #[error("invalid timeout unit: {0}")]
    InvalidUnit(char),
}
