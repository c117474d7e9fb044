// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # tokengate-api
//!
//! Stateless bearer-token authentication and role-based route authorization.
//!
//! The crate is organised around two components:
//!
//! - The token codec ([`TokenCodec`]) issues HS512-signed tokens carrying a
//!   subject, a comma-joined roles claim and an expiry, and verifies them
//!   again against an injectable [`Clock`].
//! - The authentication gate ([`middleware::AuthLayer`]) runs before every
//!   request, turns the `Authorization` header into an [`Authentication`]
//!   and rejects anything forged, expired or malformed with a 401.
//!
//! After the gate, [`middleware::AuthorizeLayer`] checks the static
//! [`PolicyTable`] and answers 403 when the caller is not entitled.
//!
//! ```text
//! request ─► TraceLayer ─► TimeoutLayer ─► AuthLayer ─► AuthorizeLayer ─► handler
//!                                            │              │
//!                                           401            403
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;

pub use audit::{AuditEvent, AuditKind, AuditSink, InMemoryAuditSink, NoOpAuditSink, TracingAuditSink};
pub use auth::{
    AccessDenied, Authentication, Claims, Clock, Identity, ManualClock, PolicyTable, RoleSet,
    RoutePolicy, SystemClock, TokenCodec, TokenConfig, TokenError, BEARER_PREFIX,
    RECOMMENDED_SECRET_LEN, ROLE_ADMIN, ROLE_USER,
};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::AppState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
