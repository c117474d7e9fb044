// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! [`TestServerBuilder`] wires a server with a manual clock and an in-memory
//! audit sink so that tests can move time and inspect audit records.

use std::sync::Arc;

use chrono::Duration;
use tokengate_api::{
    ApiConfig, ApiServer, InMemoryAuditSink, ManualClock, PolicyTable, TokenConfig,
};

use super::fixtures::{ClockFixtures, ConfigFixtures};
use super::harness::TestServer;

/// Builder for a [`TestServer`].
pub struct TestServerBuilder {
    config: ApiConfig,
    policy: Option<PolicyTable>,
    clock: Arc<ManualClock>,
}

impl TestServerBuilder {
    /// Starts from the fixture configuration and clock.
    pub fn new() -> Self {
        Self {
            config: ConfigFixtures::api(),
            policy: None,
            clock: ClockFixtures::manual(),
        }
    }

    /// Replaces the token configuration.
    pub fn token(mut self, token: TokenConfig) -> Self {
        self.config = self.config.with_token(token);
        self
    }

    /// Sets the token lifetime.
    pub fn lifetime(mut self, lifetime: Duration) -> Self {
        self.config.token = self.config.token.with_expiration(lifetime);
        self
    }

    /// Replaces the route policy table.
    pub fn policy(mut self, policy: PolicyTable) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Shares an existing clock.
    pub fn clock(mut self, clock: Arc<ManualClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the server and wraps it for in-process requests.
    pub fn build(self) -> TestServer {
        let (server, audit) = self.build_server();
        TestServer::new(server, self.clock, audit)
    }

    /// Builds the bare server, for tests that bind a listener.
    pub fn build_server(&self) -> (ApiServer, InMemoryAuditSink) {
        let audit = InMemoryAuditSink::new();

        let mut builder = ApiServer::builder()
            .config(self.config.clone())
            .clock(self.clock.clone())
            .audit_sink(Arc::new(audit.clone()));
        if let Some(policy) = &self.policy {
            builder = builder.policy(policy.clone());
        }

        let server = builder.build().expect("test server should build");
        (server, audit)
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
