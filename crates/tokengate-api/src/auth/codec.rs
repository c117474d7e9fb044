// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token issuance and verification.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{Claims, Clock, Identity, RoleSet, SystemClock, TokenError};
use crate::error::{ApiError, ApiResult};

/// Credential scheme marker, including the separating space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Credential scheme name used in challenges.
pub const BEARER_SCHEME: &str = "Bearer";

/// Default token lifetime: 10 days.
const DEFAULT_EXPIRATION_MS: i64 = 864_000_000;

/// Minimum secret length, 256 bits.
const MIN_SECRET_LEN: usize = 32;

/// Recommended secret length for HS512, 512 bits.
pub const RECOMMENDED_SECRET_LEN: usize = 64;

/// The only accepted signing algorithm.
const ALGORITHM: Algorithm = Algorithm::HS512;

// =============================================================================
// TokenConfig
// =============================================================================

/// Token configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Shared secret used for signing and verification.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Token lifetime in milliseconds.
    pub expiration_ms: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be provisioned by the deployment
            expiration_ms: DEFAULT_EXPIRATION_MS,
        }
    }
}

impl TokenConfig {
    /// Creates a new configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the token lifetime.
    pub fn with_expiration(mut self, lifetime: Duration) -> Self {
        self.expiration_ms = lifetime.num_milliseconds();
        self
    }

    /// Returns the token lifetime.
    pub fn lifetime(&self) -> Duration {
        Duration::milliseconds(self.expiration_ms)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        if self.secret.is_empty() {
            return Err(ApiError::configuration("token secret is not configured"));
        }
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(ApiError::configuration(format!(
                "token secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                self.secret.len()
            )));
        }
        if self.secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                secret_len = self.secret.len(),
                "Token secret is shorter than recommended for HS512 ({RECOMMENDED_SECRET_LEN} bytes)"
            );
        }
        if self.expiration_ms <= 0 {
            return Err(ApiError::configuration("token expiration must be positive"));
        }
        if Utc::now().checked_add_signed(self.lifetime()).is_none() {
            return Err(ApiError::configuration(format!(
                "token expiration of {} ms is out of range",
                self.expiration_ms
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("expiration_ms", &self.expiration_ms)
            .finish()
    }
}

// =============================================================================
// TokenCodec
// =============================================================================

/// Issues and verifies bearer tokens.
///
/// This is the only component that touches the secret key. Tokens are JWTs
/// signed with HS512 whose payload carries the subject (`sub`), the roles as
/// one comma-joined string (`aut`) and the expiry (`exp`).
///
/// Expiry is checked against the codec's [`Clock`] rather than the library's
/// wall clock, so verification is a pure function of the token, the key and
/// the clock reading.
#[derive(Clone)]
pub struct TokenCodec {
    lifetime: Duration,
    header: Arc<Header>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Creates a codec backed by the system clock.
    pub fn new(config: TokenConfig) -> ApiResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a codec reading time from the given clock.
    pub fn with_clock(config: TokenConfig, clock: Arc<dyn Clock>) -> ApiResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Expiry and required claims are checked against our own clock.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Ok(Self {
            lifetime: config.lifetime(),
            header: Arc::new(Header::new(ALGORITHM)),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
            clock,
        })
    }

    /// Issues a token for the subject and roles, prefixed with `Bearer `.
    pub fn issue(&self, subject: &str, roles: impl Into<RoleSet>) -> Result<String, TokenError> {
        self.issue_at(subject, roles, self.clock.now())
    }

    /// Issues a token as if the current instant were `issued_at`.
    pub fn issue_at(
        &self,
        subject: &str,
        roles: impl Into<RoleSet>,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::malformed("no user specified"));
        }

        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| TokenError::Encoding {
                reason: "token expiry is out of range".to_string(),
            })?;

        let claims = Claims::issue(subject, &roles.into(), expires_at);
        let token = encode(&self.header, &claims, &self.encoding_key).map_err(|e| {
            TokenError::Encoding {
                reason: e.to_string(),
            }
        })?;

        Ok(format!("{BEARER_PREFIX}{token}"))
    }

    /// Decodes a raw `Authorization` header value.
    ///
    /// Returns `Ok(None)` when the header is absent or does not carry a bearer
    /// credential; such requests are anonymous, not rejected.
    pub fn decode(&self, header: Option<&str>) -> Result<Option<Identity>, TokenError> {
        self.decode_at(header, self.clock.now())
    }

    /// Decodes a raw header value, verifying expiry against `now`.
    pub fn decode_at(
        &self,
        header: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<Identity>, TokenError> {
        match header.and_then(|value| value.strip_prefix(BEARER_PREFIX)) {
            Some(token) => self.verify(token, now).map(Some),
            None => Ok(None),
        }
    }

    /// Verifies a bare token (without the scheme marker).
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if claims.exp_millis.is_none() {
            return Err(TokenError::malformed("no expiry specified in token"));
        }
        if claims.is_expired_at(now) {
            return Err(TokenError::ExpiredToken {
                subject: claims.subject().map(str::to_string),
                expired_at: claims.expires_at().unwrap_or(DateTime::<Utc>::MIN_UTC),
            });
        }

        let subject = claims
            .subject()
            .ok_or_else(|| TokenError::malformed("no user specified in token"))?;

        Ok(Identity::new(subject, claims.roles()))
    }

    /// Returns the token lifetime.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Returns the current instant according to the codec's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &ALGORITHM)
            .field("lifetime_ms", &self.lifetime.num_milliseconds())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
