// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

//! Method-scoped authorization for RPC calls.
//!
//! A [`RuleTable`] maps `Service/Method` patterns to [`Requirement`]s. It is
//! built once at startup and then evaluated, without locking, for every
//! inbound call:
//!
//! ```
//! use rpc_authz::{Decision, Principal, RuleTable};
//!
//! let table = RuleTable::builder()
//!     .has_authority("Simple/StreamHello", "SCOPE_profile")
//!     .authenticated("Simple/SayHello")
//!     .deny_all("*")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.evaluate("Simple/SayHello", None), Decision::Deny);
//! let user = Principal::new("user");
//! assert_eq!(table.evaluate("Simple/SayHello", Some(&user)), Decision::Allow);
//! ```

pub mod config;
pub mod deadline;
pub mod errors;
pub mod evaluator;
pub mod pattern;
pub mod principal;
pub mod requirement;
pub mod table;

pub use deadline::apply_default;
pub use errors::ConfigurationError;
pub use evaluator::{Decision, evaluate, evaluate_with_rule};
pub use pattern::MethodPattern;
pub use principal::Principal;
pub use requirement::Requirement;
pub use table::{Rule, RuleTable, RuleTableBuilder};
