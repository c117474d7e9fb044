// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role labels and role sets.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Role granted to regular users.
pub const ROLE_USER: &str = "User";

/// Role granted to administrators.
pub const ROLE_ADMIN: &str = "Admin";

/// Separator used by the roles claim.
const ROLE_SEPARATOR: char = ',';

// =============================================================================
// RoleSet
// =============================================================================

/// A set of role labels.
///
/// Labels are trimmed on insertion and empty labels are dropped, so
/// `" User, ,Admin"` and `["Admin", "User"]` produce the same set. The set is
/// ordered, which keeps the joined claim string stable for a given set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    /// Creates an empty role set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma-separated roles string.
    pub fn parse(roles: &str) -> Self {
        roles.split(ROLE_SEPARATOR).collect()
    }

    /// Adds a role, returning `true` if it was not present yet.
    ///
    /// Blank labels are ignored.
    pub fn insert(&mut self, role: impl Into<String>) -> bool {
        let role = role.into();
        let trimmed = role.trim();
        if trimmed.is_empty() {
            return false;
        }
        if trimmed.len() == role.len() {
            self.0.insert(role)
        } else {
            self.0.insert(trimmed.to_string())
        }
    }

    /// Joins the roles into the single claim string carried by tokens.
    pub fn to_claim(&self) -> String {
        let mut claim = String::new();
        for (i, role) in self.0.iter().enumerate() {
            if i > 0 {
                claim.push(ROLE_SEPARATOR);
            }
            claim.push_str(role);
        }
        claim
    }

    /// Returns `true` if the set contains the given role.
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    /// Returns `true` if the two sets share at least one role.
    pub fn intersects(&self, other: &RoleSet) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    /// Returns an iterator over the roles in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of roles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set has no roles.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = RoleSet::new();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl From<&str> for RoleSet {
    fn from(roles: &str) -> Self {
        Self::parse(roles)
    }
}

impl<const N: usize> From<[&str; N]> for RoleSet {
    fn from(roles: [&str; N]) -> Self {
        roles.into_iter().collect()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.to_claim())
    }
}

// =============================================================================
// Tests
// =============================================================================
