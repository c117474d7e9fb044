// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertions for the three response shapes the gate and policy produce.

use axum::http::{header, StatusCode};

use super::harness::TestResponse;

impl TestResponse {
    /// Asserts 200 with the exact body.
    pub fn assert_ok_body(&self, expected: &str) {
        assert_eq!(self.status, StatusCode::OK, "body: {}", self.body);
        assert_eq!(self.body, expected);
    }

    /// Asserts 401 with the bearer challenge and no body.
    pub fn assert_unauthorized(&self) {
        assert_eq!(
            self.status,
            StatusCode::UNAUTHORIZED,
            "expected 401, got {} with body {:?}",
            self.status,
            self.body
        );
        assert_eq!(
            self.headers
                .get(header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer"),
            "401 must carry the bearer challenge"
        );
        assert!(self.body.is_empty(), "401 must not leak detail: {:?}", self.body);
    }

    /// Asserts 403 without a challenge and no body.
    pub fn assert_forbidden(&self) {
        assert_eq!(
            self.status,
            StatusCode::FORBIDDEN,
            "expected 403, got {} with body {:?}",
            self.status,
            self.body
        );
        assert!(
            self.headers.get(header::WWW_AUTHENTICATE).is_none(),
            "403 must not carry a challenge"
        );
        assert!(self.body.is_empty(), "403 must not leak detail: {:?}", self.body);
    }
}

/// Asserts that a string is a `Bearer ` credential with a three-part JWT.
pub fn assert_bearer_token(value: &str) {
    let raw = value
        .strip_prefix(tokengate_api::BEARER_PREFIX)
        .unwrap_or_else(|| panic!("missing scheme marker: {value}"));
    assert_eq!(raw.split('.').count(), 3, "not a compact JWT: {raw}");
    assert!(
        raw.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')),
        "token is not URL-safe: {raw}"
    );
}
