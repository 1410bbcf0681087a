// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

//! Server-side authorization middleware.
//!
//! The gRPC method is taken from the HTTP/2 path (`/package.Service/Method`),
//! the principal from request metadata through a [`PrincipalResolver`].
//! Denied calls are answered with a gRPC status and never reach the inner
//! service; allowed calls carry the resolved [`Principal`] in the request
//! extensions.

use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{Either, Ready, ready};
use http::{Request, Response};
use rpc_authz::{Decision, Principal, RuleTable};
use tonic::Status;
use tower_layer::Layer;
use tower_service::Service;
use tracing::{debug, warn};

use crate::resolver::PrincipalResolver;

/// Strip the leading `/` of a gRPC request path.
pub fn method_from_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Map a deny decision to the status returned to the client.
pub fn deny_status(principal: Option<&Principal>) -> Status {
    match principal {
        None => Status::unauthenticated("authentication required"),
        Some(_) => Status::permission_denied("access denied"),
    }
}

pub struct AuthorizationLayer<R> {
    table: Arc<RuleTable>,
    resolver: Arc<R>,
}

impl<R: PrincipalResolver> AuthorizationLayer<R> {
    pub fn new(table: RuleTable, resolver: R) -> Self {
        Self::from_shared(Arc::new(table), Arc::new(resolver))
    }

    pub fn from_shared(table: Arc<RuleTable>, resolver: Arc<R>) -> Self {
        Self { table, resolver }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }
}

impl<R> Clone for AuthorizationLayer<R> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

impl<S, R> Layer<S> for AuthorizationLayer<R> {
    type Service = Authorization<S, R>;

    fn layer(&self, inner: S) -> Self::Service {
        Authorization {
            inner,
            table: self.table.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

pub struct Authorization<S, R> {
    inner: S,
    table: Arc<RuleTable>,
    resolver: Arc<R>,
}

impl<S: Clone, R> Clone for Authorization<S, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            table: self.table.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

impl<S, R, ReqBody, ResBody> Service<Request<ReqBody>> for Authorization<S, R>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    R: PrincipalResolver,
    ResBody: Default,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Either<S::Future, Ready<Result<Response<ResBody>, S::Error>>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let method = method_from_path(req.uri().path()).to_string();
        let principal = self.resolver.resolve(req.headers());

        let (decision, rule) = self.table.evaluate_with_rule(&method, principal.as_ref());
        let pattern = rule.map(|r| r.pattern().as_str()).unwrap_or("<none>");
        let principal_id = principal.as_ref().map(|p| p.id()).unwrap_or("<anonymous>");

        match decision {
            Decision::Allow => {
                debug!(%method, %pattern, principal = %principal_id, "call authorized");
                if let Some(principal) = principal {
                    req.extensions_mut().insert(principal);
                }
                Either::Left(self.inner.call(req))
            }
            Decision::Deny => {
                warn!(%method, %pattern, principal = %principal_id, "call denied");
                let status = deny_status(principal.as_ref());
                Either::Right(ready(Ok(status.into_http())))
            }
        }
    }
}
