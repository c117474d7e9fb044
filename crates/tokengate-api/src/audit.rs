// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Security audit trail.
//!
//! The gate records every rejected credential, the authorization stage records
//! every denial, and the issuance handlers record every token they hand out.
//! Where the records go is decided by the [`AuditSink`] installed in
//! [`AppState`](crate::AppState).

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{AccessDenied, TokenError};

// =============================================================================
// AuditKind
// =============================================================================

/// Category of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// A presented credential was refused by the gate.
    AuthenticationRejected,
    /// The route policy refused the caller.
    AccessDenied,
    /// A token was issued.
    TokenIssued,
}

impl AuditKind {
    /// Returns the snake_case name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditKind::AuthenticationRejected => "authentication_rejected",
            AuditKind::AccessDenied => "access_denied",
            AuditKind::TokenIssued => "token_issued",
        }
    }
}

impl fmt::Display for AuditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// AuditEvent
// =============================================================================

/// A single audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique, time-ordered event id.
    pub id: Uuid,
    /// Event category.
    pub kind: AuditKind,
    /// Request method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Subject involved, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Machine-readable reason (`expired_token`, `insufficient_role`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    /// Creates an event of the given kind for a request.
    pub fn new(kind: AuditKind, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            method: method.into(),
            path: path.into(),
            subject: None,
            reason: None,
            timestamp: Utc::now(),
        }
    }

    /// Records a credential refused by the gate.
    pub fn rejected(method: impl Into<String>, path: impl Into<String>, err: &TokenError) -> Self {
        let mut event = Self::new(AuditKind::AuthenticationRejected, method, path)
            .with_reason(err.kind());
        event.subject = err.subject().map(str::to_string);
        event
    }

    /// Records a request refused by the route policy.
    pub fn denied(
        method: impl Into<String>,
        path: impl Into<String>,
        subject: Option<&str>,
        denied: &AccessDenied,
    ) -> Self {
        let mut event = Self::new(AuditKind::AccessDenied, method, path).with_reason(denied.kind());
        event.subject = subject.map(str::to_string);
        event
    }

    /// Records an issued token.
    pub fn issued(method: impl Into<String>, path: impl Into<String>, subject: &str) -> Self {
        Self::new(AuditKind::TokenIssued, method, path).with_subject(subject)
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

// =============================================================================
// AuditSink
// =============================================================================

/// Destination for audit events.
///
/// `record` is called inline on the request path, so implementations must not
/// block.
pub trait AuditSink: Send + Sync {
    /// Records an event.
    fn record(&self, event: AuditEvent);

    /// Returns the name of this sink.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Sink that emits events as structured `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        let subject = event.subject.as_deref().unwrap_or("-");
        let reason = event.reason.as_deref().unwrap_or("-");

        match event.kind {
            AuditKind::TokenIssued => tracing::info!(
                target: "tokengate::audit",
                event_id = %event.id,
                kind = %event.kind,
                method = %event.method,
                path = %event.path,
                subject,
                "Token issued"
            ),
            AuditKind::AuthenticationRejected | AuditKind::AccessDenied => tracing::warn!(
                target: "tokengate::audit",
                event_id = %event.id,
                kind = %event.kind,
                method = %event.method,
                path = %event.path,
                subject,
                reason,
                "Request refused"
            ),
        }
    }

    fn name(&self) -> &str {
        "tracing"
    }
}

/// Sink that keeps events in memory.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditSink {
    events: Arc<RwLock<Vec<AuditEvent>>>,
}

impl InMemoryAuditSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.read().clone()
    }

    /// Returns the recorded events of one kind.
    pub fn events_of(&self, kind: AuditKind) -> Vec<AuditEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Drops all recorded events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events.write().push(event);
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpAuditSink;

impl AuditSink for NoOpAuditSink {
    fn record(&self, _event: AuditEvent) {}

    fn name(&self) -> &str {
        "noop"
    }
}

// =============================================================================
// Tests
// =============================================================================
