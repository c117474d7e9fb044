// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization failures.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::RoleSet;

// =============================================================================
// TokenError
// =============================================================================

/// Reasons a presented token is refused.
///
/// An absent credential is not an error: decoding returns `Ok(None)` for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token is structurally broken or its signature does not verify.
    #[error("Invalid token: {reason}")]
    InvalidToken {
        /// What failed.
        reason: String,
    },

    /// The signature is valid but the token has expired.
    #[error("Token expired at {expired_at}{}", subject_suffix(.subject))]
    ExpiredToken {
        /// Subject of the expired token, when present.
        subject: Option<String>,
        /// Instant the token expired.
        expired_at: DateTime<Utc>,
    },

    /// The signature is valid but a required claim is missing.
    #[error("Malformed claims: {reason}")]
    MalformedClaims {
        /// Which claim is missing.
        reason: String,
    },

    /// A token could not be produced.
    #[error("Failed to encode token: {reason}")]
    Encoding {
        /// Underlying failure.
        reason: String,
    },
}

fn subject_suffix(subject: &Option<String>) -> String {
    match subject {
        Some(subject) => format!(". User: {subject}."),
        None => String::new(),
    }
}

impl TokenError {
    /// Creates an invalid token error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            reason: reason.into(),
        }
    }

    /// Creates a malformed claims error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedClaims {
            reason: reason.into(),
        }
    }

    /// Returns a stable label for logs and audit records.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::InvalidToken { .. } => "invalid_token",
            TokenError::ExpiredToken { .. } => "expired_token",
            TokenError::MalformedClaims { .. } => "malformed_claims",
            TokenError::Encoding { .. } => "encoding",
        }
    }

    /// Returns the subject the failure refers to, if known.
    pub fn subject(&self) -> Option<&str> {
        match self {
            TokenError::ExpiredToken { subject, .. } => subject.as_deref(),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        let reason = match err.kind() {
            ErrorKind::InvalidToken => "invalid token format".to_string(),
            ErrorKind::InvalidSignature => "invalid token signature".to_string(),
            ErrorKind::InvalidAlgorithm => "unexpected signing algorithm".to_string(),
            ErrorKind::Base64(_) => "invalid base64 encoding".to_string(),
            ErrorKind::Json(_) => "invalid claims encoding".to_string(),
            ErrorKind::Utf8(_) => "invalid utf-8 in token".to_string(),
            _ => format!("token validation failed: {err}"),
        };
        Self::InvalidToken { reason }
    }
}

// =============================================================================
// AccessDenied
// =============================================================================

/// Reasons the route policy refuses a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// The caller is authenticated but holds none of the required roles.
    #[error("'{subject}' lacks any of the roles {required}")]
    InsufficientRole {
        /// The authenticated subject.
        subject: String,
        /// Roles that would have been accepted.
        required: RoleSet,
    },

    /// The route requires a role and the caller is anonymous.
    #[error("anonymous caller, one of {required} is required")]
    AnonymousCaller {
        /// Roles that would have been accepted.
        required: RoleSet,
    },

    /// The route denies everyone, explicitly or by having no policy.
    #[error("no policy permits {method} {path}")]
    NoMatchingPolicy {
        /// Request method.
        method: String,
        /// Request path.
        path: String,
    },
}

impl AccessDenied {
    /// Returns a stable label for logs and audit records.
    pub fn kind(&self) -> &'static str {
        match self {
            AccessDenied::InsufficientRole { .. } => "insufficient_role",
            AccessDenied::AnonymousCaller { .. } => "anonymous_caller",
            AccessDenied::NoMatchingPolicy { .. } => "no_matching_policy",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
