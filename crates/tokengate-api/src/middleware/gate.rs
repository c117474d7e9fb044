// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication gate.
//!
//! Runs once per request, before any route logic. A request without a bearer
//! credential passes through as anonymous; one with a valid credential passes
//! through authenticated; anything else is answered with 401 and never reaches
//! a handler.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::audit::{AuditEvent, AuditSink, NoOpAuditSink};
use crate::auth::{Authentication, Identity, TokenCodec, TokenError};
use crate::error::ApiError;

// =============================================================================
// GateOutcome
// =============================================================================

/// Result of inspecting a request's `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// No bearer credential; continue without identity.
    Anonymous,
    /// A valid credential; continue with this identity.
    Authenticated(Identity),
    /// A credential that must be refused.
    Rejected(TokenError),
}

/// Decides the gate outcome for a raw `Authorization` header.
pub fn evaluate(codec: &TokenCodec, header: Option<&HeaderValue>) -> GateOutcome {
    let value = match header.map(|value| std::str::from_utf8(value.as_bytes())) {
        None => None,
        Some(Ok(value)) => Some(value),
        Some(Err(_)) => {
            return GateOutcome::Rejected(TokenError::invalid(
                "authorization header is not valid utf-8",
            ));
        }
    };

    match codec.decode(value) {
        Ok(Some(identity)) => GateOutcome::Authenticated(identity),
        Ok(None) => GateOutcome::Anonymous,
        Err(e) => GateOutcome::Rejected(e),
    }
}

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer installing the authentication gate.
#[derive(Clone)]
pub struct AuthLayer {
    codec: Arc<TokenCodec>,
    audit: Arc<dyn AuditSink>,
}

impl AuthLayer {
    /// Creates a new gate layer.
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self {
            codec,
            audit: Arc::new(NoOpAuditSink),
        }
    }

    /// Records rejected credentials to the given sink.
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            codec: self.codec.clone(),
            audit: self.audit.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware enforcing the authentication gate.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    codec: Arc<TokenCodec>,
    audit: Arc<dyn AuditSink>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let outcome = evaluate(&self.codec, req.headers().get(header::AUTHORIZATION));
        let audit = self.audit.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // A caller must never be able to smuggle in its own identity.
            req.extensions_mut().remove::<Authentication>();

            let auth = match outcome {
                GateOutcome::Anonymous => Authentication::Anonymous,
                GateOutcome::Authenticated(identity) => {
                    tracing::trace!(subject = identity.subject(), "Request authenticated");
                    Authentication::Authenticated(identity)
                }
                GateOutcome::Rejected(err) => {
                    tracing::warn!(
                        kind = err.kind(),
                        method = %req.method(),
                        path = req.uri().path(),
                        "Rejecting request: {err}"
                    );
                    audit.record(AuditEvent::rejected(
                        req.method().as_str(),
                        req.uri().path(),
                        &err,
                    ));
                    return Ok(ApiError::from(err).into_response());
                }
            };

            req.extensions_mut().insert(auth);
            inner.call(req).await
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
