// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route authorization middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::audit::{AuditEvent, AuditSink, NoOpAuditSink};
use crate::auth::{Authentication, PolicyTable};
use crate::error::ApiError;

// =============================================================================
// AuthorizeLayer
// =============================================================================

/// Layer enforcing the route policy table.
///
/// Must sit inside [`AuthLayer`](super::AuthLayer) so that the request
/// already carries its [`Authentication`].
#[derive(Clone)]
pub struct AuthorizeLayer {
    policy: PolicyTable,
    audit: Arc<dyn AuditSink>,
}

impl AuthorizeLayer {
    /// Creates a new authorization layer.
    pub fn new(policy: PolicyTable) -> Self {
        Self {
            policy,
            audit: Arc::new(NoOpAuditSink),
        }
    }

    /// Records denials to the given sink.
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }
}

impl<S> Layer<S> for AuthorizeLayer {
    type Service = AuthorizeMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthorizeMiddleware {
            inner,
            policy: self.policy.clone(),
            audit: self.audit.clone(),
        }
    }
}

// =============================================================================
// AuthorizeMiddleware
// =============================================================================

/// Middleware for route policy enforcement.
#[derive(Clone)]
pub struct AuthorizeMiddleware<S> {
    inner: S,
    policy: PolicyTable,
    audit: Arc<dyn AuditSink>,
}

impl<S> Service<Request<Body>> for AuthorizeMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let policy = self.policy.clone();
        let audit = self.audit.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            {
                let anonymous = Authentication::Anonymous;
                let auth = req.extensions().get::<Authentication>().unwrap_or(&anonymous);
                let method = req.method();
                let path = req.uri().path();

                if let Err(denied) = policy.authorize(method, path, auth) {
                    let subject = auth.identity().map(|identity| identity.subject());
                    tracing::warn!(
                        kind = denied.kind(),
                        method = %method,
                        path,
                        subject = subject.unwrap_or("-"),
                        "Access denied: {denied}"
                    );
                    audit.record(AuditEvent::denied(method.as_str(), path, subject, &denied));
                    return Ok(ApiError::from(denied).into_response());
                }
            }

            inner.call(req).await
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
