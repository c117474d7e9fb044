// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RoleSet;

/// Claims carried inside a token.
///
/// Every field is optional on the wire so that a token with a valid signature
/// but a missing claim can be told apart from a structurally broken one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the name of the authenticated user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Roles as one comma-joined string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aut: Option<String>,

    /// Expiration time in Unix milliseconds.
    ///
    /// On the wire this is a NumericDate in seconds, with a fractional part
    /// when the expiry does not fall on a whole second.
    #[serde(
        rename = "exp",
        default,
        with = "numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub exp_millis: Option<i64>,
}

impl Claims {
    /// Creates claims for a freshly issued token.
    ///
    /// The expiry keeps millisecond precision; anything finer is truncated.
    pub fn issue(subject: impl Into<String>, roles: &RoleSet, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: Some(subject.into()),
            aut: Some(roles.to_claim()),
            exp_millis: Some(expires_at.timestamp_millis()),
        }
    }

    /// Returns the subject, treating an empty subject as missing.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns the roles parsed from the roles claim.
    pub fn roles(&self) -> RoleSet {
        self.aut.as_deref().map(RoleSet::parse).unwrap_or_default()
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp_millis.and_then(DateTime::from_timestamp_millis)
    }

    /// Returns `true` if the claims are expired at the given instant.
    ///
    /// Compared at millisecond resolution. A token expiring exactly at `now`
    /// is already expired. Claims without an expiry are reported as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.exp_millis {
            Some(exp) => exp <= now.timestamp_millis(),
            None => true,
        }
    }
}

/// Serde adapter between Unix milliseconds and a JWT NumericDate.
mod numeric_date {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(millis: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match millis {
            Some(ms) if ms % 1000 == 0 => serializer.serialize_i64(ms / 1000),
            Some(ms) => serializer.serialize_f64(*ms as f64 / 1000.0),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let seconds = Option::<f64>::deserialize(deserializer)?;
        // Out-of-range values saturate, which keeps them comparable.
        Ok(seconds
            .filter(|s| s.is_finite())
            .map(|s| (s * 1000.0).round() as i64))
    }
}

// =============================================================================
// Tests
// =============================================================================
