// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use crate::audit::{AuditSink, TracingAuditSink};
use crate::auth::{Clock, PolicyTable, SystemClock, TokenCodec};
use crate::config::ApiConfig;

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// Everything in here is read-only after startup, so cloning the state per
/// request is a handful of reference count bumps.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Token codec for issuance and verification.
    pub codec: Arc<TokenCodec>,
    /// Route policy table.
    pub policy: PolicyTable,
    /// Audit sink.
    pub audit_sink: Arc<dyn AuditSink>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token codec.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Returns the route policy table.
    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    /// Returns the audit sink.
    pub fn audit(&self) -> &Arc<dyn AuditSink> {
        &self.audit_sink
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    codec: Option<Arc<TokenCodec>>,
    clock: Option<Arc<dyn Clock>>,
    policy: Option<PolicyTable>,
    audit_sink: Option<Arc<dyn AuditSink>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            codec: None,
            clock: None,
            policy: None,
            audit_sink: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the token codec, bypassing the one built from the configuration.
    pub fn codec(mut self, codec: Arc<TokenCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Sets the clock used when the codec is built from the configuration.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the route policy table.
    pub fn policy(mut self, policy: PolicyTable) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Sets the audit sink.
    pub fn audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    /// Builds the AppState.
    ///
    /// Fails if no codec was given and the token configuration is invalid.
    pub fn build(self) -> crate::error::ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let codec = match self.codec {
            Some(codec) => codec,
            None => {
                let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
                Arc::new(TokenCodec::with_clock(config.token.clone(), clock)?)
            }
        };

        let policy = self.policy.unwrap_or_else(PolicyTable::default_routes);

        let audit_sink = self
            .audit_sink
            .unwrap_or_else(|| Arc::new(TracingAuditSink));

        Ok(AppState {
            config: Arc::new(config),
            codec,
            policy,
            audit_sink,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl axum::extract::FromRef<AppState> for Arc<TokenCodec> {
    fn from_ref(state: &AppState) -> Self {
        state.codec.clone()
    }
}

impl axum::extract::FromRef<AppState> for PolicyTable {
    fn from_ref(state: &AppState) -> Self {
        state.policy.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<ApiConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
