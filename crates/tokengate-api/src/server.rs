// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::audit::AuditSink;
use crate::auth::{Clock, PolicyTable, TokenCodec};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{AuthLayer, AuthorizeLayer};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// This is the main entry point for creating and running the HTTP server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Creates a server builder.
    pub fn builder() -> ApiServerBuilder {
        ApiServerBuilder::new()
    }

    /// Creates the router with all routes and middleware.
    ///
    /// The gate and the policy wrap every route including the fallback, so an
    /// unknown path or method is answered by the policy (403) rather than by
    /// routing (404/405).
    pub fn router(&self) -> Router {
        let auth = AuthLayer::new(self.state.codec.clone()).with_audit(self.state.audit_sink.clone());
        let authorize =
            AuthorizeLayer::new(self.state.policy.clone()).with_audit(self.state.audit_sink.clone());

        // Outermost first
        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout,
            ))
            .layer(auth)
            .layer(authorize);

        Router::new()
            // Issuance endpoints (permit-all)
            .route("/getUserToken", get(handlers::get_user_token))
            .route("/getAdminToken", get(handlers::get_admin_token))
            // Protected endpoints
            .route("/getUserInfo", get(handlers::get_user_info))
            .route("/getAdminInfo", get(handlers::get_admin_info))
            .fallback(fallback)
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server until the process is killed.
    pub async fn run(self) -> ApiResult<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {addr}: {e}")))?;

        self.serve(listener, shutdown_signal).await
    }

    /// Serves on an already bound listener with graceful shutdown.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let router = self.router();
        let addr = listener
            .local_addr()
            .map_err(|e| ApiError::internal(format!("Failed to read local address: {e}")))?;

        info!(%addr, "Starting API server");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal(format!("Server error: {e}")))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn fallback() -> StatusCode {
    StatusCode::NOT_FOUND
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self {
            state_builder: AppState::builder(),
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the token codec.
    pub fn codec(mut self, codec: Arc<TokenCodec>) -> Self {
        self.state_builder = self.state_builder.codec(codec);
        self
    }

    /// Sets the clock used by the codec built from the configuration.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.state_builder = self.state_builder.clock(clock);
        self
    }

    /// Sets the route policy table.
    pub fn policy(mut self, policy: PolicyTable) -> Self {
        self.state_builder = self.state_builder.policy(policy);
        self
    }

    /// Sets the audit sink.
    pub fn audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.state_builder = self.state_builder.audit_sink(sink);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

impl Default for ApiServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
