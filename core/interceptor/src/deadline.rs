// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

//! Client-side middleware applying a default deadline to outbound calls.

use std::task::{Context, Poll};
use std::time::Duration;

use http::{HeaderValue, Request};
use rpc_authz::config::{Configuration, DeadlineConfig};
use rpc_authz::{ConfigurationError, apply_default};
use tower_layer::Layer;
use tower_service::Service;
use tracing::{debug, warn};

use crate::grpc_timeout::{self, GRPC_TIMEOUT_HEADER};

#[derive(Debug, Clone, Copy)]
pub struct DefaultDeadlineLayer {
    default: Duration,
}

impl DefaultDeadlineLayer {
    pub fn new(default: Duration) -> Self {
        Self { default }
    }

    /// Build the layer from a configuration, rejecting a zero deadline.
    pub fn from_config(config: &DeadlineConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self::new(config.default_deadline()))
    }

    pub fn default_deadline(&self) -> Duration {
        self.default
    }
}

impl<S> Layer<S> for DefaultDeadlineLayer {
    type Service = DefaultDeadline<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DefaultDeadline {
            inner,
            default: self.default,
        }
    }
}

/// Sets `grpc-timeout` on requests that do not carry one.
#[derive(Debug, Clone)]
pub struct DefaultDeadline<S> {
    inner: S,
    default: Duration,
}

impl<S> DefaultDeadline<S> {
    pub fn new(inner: S, default: Duration) -> Self {
        Self { inner, default }
    }

    fn set_deadline<B>(&self, req: &mut Request<B>) {
        let headers = req.headers_mut();

        let existing = match headers.get(GRPC_TIMEOUT_HEADER) {
            None => None,
            Some(value) => {
                let decoded = value
                    .to_str()
                    .map_err(|e| e.to_string())
                    .and_then(|v| grpc_timeout::decode(v).map_err(|e| e.to_string()));

                match decoded {
                    Ok(timeout) => Some(timeout),
                    Err(e) => {
                        // leave it to the transport to reject it
                        debug!(error = %e, "keeping unparseable grpc-timeout header");
                        return;
                    }
                }
            }
        };

        let deadline = apply_default(existing, self.default);
        if existing.is_some() {
            return;
        }

        match HeaderValue::from_str(&grpc_timeout::encode(deadline)) {
            Ok(value) => {
                debug!(?deadline, "applying default deadline");
                headers.insert(GRPC_TIMEOUT_HEADER, value);
            }
            Err(e) => warn!(error = %e, "failed to encode default deadline"),
        }
    }
}

impl<S, B> Service<Request<B>> for DefaultDeadline<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        self.set_deadline(&mut req);
        self.inner.call(req)
    }
}
