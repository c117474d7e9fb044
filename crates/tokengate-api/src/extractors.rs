// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{Authentication, Identity, TokenError};
use crate::error::ApiError;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for authenticated requests.
///
/// Reads the [`Authentication`] the gate attached to the request. Returns 401
/// if the request is anonymous, which only happens when a route that needs an
/// identity is not guarded by a role policy.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(identity): Auth) -> impl IntoResponse {
///     format!("Hello, {}", identity.subject())
/// }
/// ```
pub struct Auth(pub Identity);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Authentication>() {
            Some(Authentication::Authenticated(identity)) => Ok(Auth(identity.clone())),
            _ => {
                tracing::warn!(path = parts.uri.path(), "Identity required but request is anonymous");
                Err(ApiError::from(TokenError::invalid("no authenticated identity")))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
