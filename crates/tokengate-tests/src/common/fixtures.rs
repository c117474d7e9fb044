// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Secrets, instants and hand-signed tokens. Hand-signed tokens bypass
//! [`TokenCodec::issue`] so that claim sets the codec would never produce can
//! still be presented to it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tokengate_api::{ApiConfig, ManualClock, TokenCodec, TokenConfig, BEARER_PREFIX};

/// Signing secret used by every fixture server (64 bytes).
pub const TEST_SECRET: &str = "integration-test-secret-key-long-enough-for-hs512-signing-000001";

/// A second valid secret, for cross-key tests.
pub const OTHER_SECRET: &str = "a-completely-different-secret-key-also-long-enough-for-hs512-sig";

/// Start instant of fixture clocks, on a whole second.
pub const START_MILLIS: i64 = 1_700_000_000_000;

/// Default token lifetime (10 days).
pub const LIFETIME_MS: i64 = 864_000_000;

// =============================================================================
// Config Fixtures
// =============================================================================

/// Fixture providing configurations.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// Token configuration with [`TEST_SECRET`] and the default lifetime.
    pub fn token() -> TokenConfig {
        TokenConfig::new(TEST_SECRET)
    }

    /// Server configuration on loopback with [`TEST_SECRET`].
    pub fn api() -> ApiConfig {
        ApiConfig::default()
            .with_host([127, 0, 0, 1].into())
            .with_token(Self::token())
    }
}

// =============================================================================
// Clock Fixtures
// =============================================================================

/// Fixture providing deterministic clocks.
pub struct ClockFixtures;

impl ClockFixtures {
    /// Instant of [`START_MILLIS`].
    pub fn start() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(START_MILLIS).expect("valid fixture instant")
    }

    /// A manual clock at [`START_MILLIS`].
    pub fn manual() -> Arc<ManualClock> {
        Arc::new(ManualClock::from_millis(START_MILLIS))
    }

    /// A codec over [`TEST_SECRET`] driven by the given clock.
    pub fn codec(clock: Arc<ManualClock>) -> TokenCodec {
        TokenCodec::with_clock(ConfigFixtures::token(), clock).expect("valid fixture config")
    }
}

// =============================================================================
// Token Fixtures
// =============================================================================

/// Fixture producing hand-signed tokens.
pub struct TokenFixtures;

impl TokenFixtures {
    /// Builds a claim set; `None` leaves the claim out.
    pub fn claims(sub: Option<&str>, aut: Option<&str>, exp: Option<i64>) -> Value {
        let mut claims = serde_json::Map::new();
        if let Some(sub) = sub {
            claims.insert("sub".into(), json!(sub));
        }
        if let Some(aut) = aut {
            claims.insert("aut".into(), json!(aut));
        }
        if let Some(exp) = exp {
            claims.insert("exp".into(), json!(exp));
        }
        Value::Object(claims)
    }

    /// Expiry (seconds) one lifetime after [`START_MILLIS`].
    pub fn default_exp() -> i64 {
        (START_MILLIS + LIFETIME_MS) / 1000
    }

    /// Signs claims with HS512 and the given secret. No scheme marker.
    pub fn sign(secret: &str, claims: &Value) -> String {
        Self::sign_with(Algorithm::HS512, secret, claims)
    }

    /// Signs claims with the given HMAC algorithm. No scheme marker.
    pub fn sign_with(algorithm: Algorithm, secret: &str, claims: &Value) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("fixture token should encode")
    }

    /// Prefixes a raw token with `Bearer `.
    pub fn bearer(raw: &str) -> String {
        format!("{BEARER_PREFIX}{raw}")
    }

    /// A well-formed token for `subject`/`roles` signed with [`TEST_SECRET`].
    pub fn valid(subject: &str, roles: &str) -> String {
        Self::bearer(&Self::sign(
            TEST_SECRET,
            &Self::claims(Some(subject), Some(roles), Some(Self::default_exp())),
        ))
    }

    /// The same token signed with [`OTHER_SECRET`].
    pub fn foreign(subject: &str, roles: &str) -> String {
        Self::bearer(&Self::sign(
            OTHER_SECRET,
            &Self::claims(Some(subject), Some(roles), Some(Self::default_exp())),
        ))
    }

    /// Flips one character of the signature segment at `index`.
    pub fn tamper_signature(bearer: &str, index: usize) -> String {
        let raw = bearer.strip_prefix(BEARER_PREFIX).unwrap_or(bearer);
        let split = raw.rfind('.').expect("token has a signature segment") + 1;
        let (head, signature) = raw.split_at(split);

        let mut chars: Vec<char> = signature.chars().collect();
        let position = index % chars.len();
        chars[position] = if chars[position] == 'A' { 'B' } else { 'A' };

        Self::bearer(&format!("{head}{}", chars.into_iter().collect::<String>()))
    }

    /// Length of the signature segment.
    pub fn signature_len(bearer: &str) -> usize {
        bearer.rsplit('.').next().map(str::len).unwrap_or_default()
    }
}
