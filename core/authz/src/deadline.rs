// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// Effective deadline of an outbound call: the caller's own deadline if it
/// set one, `default` otherwise. A caller-specified deadline is never
/// overridden, even if it is longer than the default.
pub fn apply_default(existing: Option<Duration>, default: Duration) -> Duration {
    existing.unwrap_or(default)
}
