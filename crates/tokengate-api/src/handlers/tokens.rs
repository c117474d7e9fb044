// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token issuance handlers.
//!
//! Both endpoints hand out a token for a fixed demo identity without asking
//! for any credential. The route policy marks them permit-all.

use axum::{
    extract::State,
    http::{Method, Uri},
};

use crate::audit::AuditEvent;
use crate::auth::{ROLE_ADMIN, ROLE_USER};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Subject of the token issued by [`get_user_token`].
pub const DEMO_USER: &str = "user";

/// Subject of the token issued by [`get_admin_token`].
pub const DEMO_ADMIN: &str = "admin";

/// GET /getUserToken
///
/// Returns `Bearer <token>` for subject `user` with role `User`.
pub async fn get_user_token(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> ApiResult<String> {
    issue(&state, &method, &uri, DEMO_USER, ROLE_USER)
}

/// GET /getAdminToken
///
/// Returns `Bearer <token>` for subject `admin` with role `Admin`.
pub async fn get_admin_token(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> ApiResult<String> {
    issue(&state, &method, &uri, DEMO_ADMIN, ROLE_ADMIN)
}

fn issue(
    state: &AppState,
    method: &Method,
    uri: &Uri,
    subject: &str,
    role: &str,
) -> ApiResult<String> {
    let token = state.codec().issue(subject, role).map_err(|e| {
        ApiError::internal(format!("failed to issue token for '{subject}': {e}"))
    })?;

    state
        .audit()
        .record(AuditEvent::issued(method.as_str(), uri.path(), subject));
    tracing::debug!(subject, role, "Issued token");

    Ok(token)
}

// =============================================================================
// Tests
// =============================================================================
