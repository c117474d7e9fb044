// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Static route policy table.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use super::{AccessDenied, Authentication, RoleSet, ROLE_ADMIN, ROLE_USER};

// =============================================================================
// RoutePolicy
// =============================================================================

/// Requirement a route places on the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePolicy {
    /// Anyone may call the route, with or without a credential.
    PermitAll,
    /// The caller must hold at least one of the roles.
    RequireAnyOf(RoleSet),
    /// Nobody may call the route.
    DenyAll,
}

impl RoutePolicy {
    /// Checks the policy against the caller.
    ///
    /// `method` and `path` are only used to describe a denial.
    pub fn check(
        &self,
        method: &Method,
        path: &str,
        auth: &Authentication,
    ) -> Result<(), AccessDenied> {
        match self {
            RoutePolicy::PermitAll => Ok(()),
            RoutePolicy::RequireAnyOf(required) => match auth.identity() {
                Some(identity) if identity.has_any_role(required) => Ok(()),
                Some(identity) => Err(AccessDenied::InsufficientRole {
                    subject: identity.subject().to_string(),
                    required: required.clone(),
                }),
                None => Err(AccessDenied::AnonymousCaller {
                    required: required.clone(),
                }),
            },
            RoutePolicy::DenyAll => Err(AccessDenied::NoMatchingPolicy {
                method: method.to_string(),
                path: path.to_string(),
            }),
        }
    }
}

impl fmt::Display for RoutePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutePolicy::PermitAll => write!(f, "permit-all"),
            RoutePolicy::RequireAnyOf(roles) => write!(f, "require-any-of{roles}"),
            RoutePolicy::DenyAll => write!(f, "deny-all"),
        }
    }
}

// =============================================================================
// PolicyTable
// =============================================================================

/// Mapping from `(method, path)` to the policy guarding it.
///
/// Built once at startup and shared read-only across all requests. Lookups
/// are exact: there is no prefix or pattern matching, and any pair not in the
/// table is denied.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    routes: Arc<HashMap<(Method, String), RoutePolicy>>,
}

static DENY_ALL: RoutePolicy = RoutePolicy::DenyAll;

impl PolicyTable {
    /// Creates a policy table builder.
    pub fn builder() -> PolicyTableBuilder {
        PolicyTableBuilder::new()
    }

    /// Returns the table guarding the token and info endpoints.
    ///
    /// | Method | Path           | Policy                     |
    /// |--------|----------------|----------------------------|
    /// | GET    | /getUserToken  | permit-all                 |
    /// | GET    | /getAdminToken | permit-all                 |
    /// | GET    | /getUserInfo   | require-any-of{User,Admin} |
    /// | GET    | /getAdminInfo  | require-any-of{Admin}      |
    pub fn default_routes() -> Self {
        Self::builder()
            .permit_all(Method::GET, "/getUserToken")
            .permit_all(Method::GET, "/getAdminToken")
            .require_any_of(Method::GET, "/getUserInfo", [ROLE_USER, ROLE_ADMIN])
            .require_any_of(Method::GET, "/getAdminInfo", [ROLE_ADMIN])
            .build()
    }

    /// Returns the policy for a route, `DenyAll` if none is registered.
    pub fn resolve(&self, method: &Method, path: &str) -> &RoutePolicy {
        self.routes
            .get(&(method.clone(), path.to_string()))
            .unwrap_or(&DENY_ALL)
    }

    /// Decides whether the caller may proceed to the route.
    pub fn authorize(
        &self,
        method: &Method,
        path: &str,
        auth: &Authentication,
    ) -> Result<(), AccessDenied> {
        self.resolve(method, path).check(method, path, auth)
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::default_routes()
    }
}

// =============================================================================
// PolicyTableBuilder
// =============================================================================

/// Builder for constructing policy tables.
#[derive(Debug, Default)]
pub struct PolicyTableBuilder {
    routes: HashMap<(Method, String), RoutePolicy>,
}

impl PolicyTableBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a policy for a route, replacing any earlier one.
    pub fn route(mut self, method: Method, path: impl Into<String>, policy: RoutePolicy) -> Self {
        let path = path.into();
        if let Some(previous) = self.routes.insert((method.clone(), path.clone()), policy) {
            tracing::debug!(%method, %path, %previous, "Replacing route policy");
        }
        self
    }

    /// Lets anyone call the route.
    pub fn permit_all(self, method: Method, path: impl Into<String>) -> Self {
        self.route(method, path, RoutePolicy::PermitAll)
    }

    /// Requires any of the given roles for the route.
    pub fn require_any_of(
        self,
        method: Method,
        path: impl Into<String>,
        roles: impl Into<RoleSet>,
    ) -> Self {
        self.route(method, path, RoutePolicy::RequireAnyOf(roles.into()))
    }

    /// Denies the route explicitly.
    pub fn deny_all(self, method: Method, path: impl Into<String>) -> Self {
        self.route(method, path, RoutePolicy::DenyAll)
    }

    /// Builds the table.
    pub fn build(self) -> PolicyTable {
        PolicyTable {
            routes: Arc::new(self.routes),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
