// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-request identity.

use serde::{Deserialize, Serialize};

use super::RoleSet;

// =============================================================================
// Identity
// =============================================================================

/// The authenticated subject of a request and the roles granted to it.
///
/// Built by the authentication gate from a verified token and attached to the
/// request it belongs to. It never outlives that request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    subject: String,
    roles: RoleSet,
}

impl Identity {
    /// Creates an identity.
    pub fn new(subject: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            subject: subject.into(),
            roles,
        }
    }

    /// Returns the subject name.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the granted roles.
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Returns `true` if the identity has the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns `true` if the identity has any of the given roles.
    pub fn has_any_role(&self, roles: &RoleSet) -> bool {
        self.roles.intersects(roles)
    }
}

// =============================================================================
// Authentication
// =============================================================================

/// Outcome of the authentication gate for a request that was let through.
///
/// Stored in the request extensions; route logic reads it instead of any
/// shared holder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Authentication {
    /// No credential was presented.
    #[default]
    Anonymous,
    /// A valid credential was presented.
    Authenticated(Identity),
}

impl Authentication {
    /// Returns the identity, if authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Authentication::Anonymous => None,
            Authentication::Authenticated(identity) => Some(identity),
        }
    }

    /// Returns `true` if no credential was presented.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Authentication::Anonymous)
    }
}

impl From<Option<Identity>> for Authentication {
    fn from(identity: Option<Identity>) -> Self {
        match identity {
            Some(identity) => Authentication::Authenticated(identity),
            None => Authentication::Anonymous,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
