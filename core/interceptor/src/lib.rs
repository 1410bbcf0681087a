// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

//! Tower middleware binding [`rpc_authz`] rule tables to gRPC services.
//!
//! - [`AuthorizationLayer`] authorizes inbound calls against a rule table.
//! - [`DefaultDeadlineLayer`] sets a default `grpc-timeout` on outbound calls.

pub mod authorization;
pub mod deadline;
pub mod errors;
pub mod grpc_timeout;
pub mod resolver;

pub use authorization::{Authorization, AuthorizationLayer};
pub use deadline::{DefaultDeadline, DefaultDeadlineLayer};
pub use errors::{ResolverConfigError, TimeoutError};
pub use resolver::{PrincipalResolver, StaticTokenConfig, StaticTokenResolver, TokenConfig};
