// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - Token issuance and verification ([`TokenCodec`])
//! - The per-request identity ([`Identity`], [`Authentication`])
//! - The static route policy table ([`PolicyTable`])
//! - An injectable clock for expiry checks ([`Clock`])

mod claims;
mod clock;
mod codec;
mod error;
mod identity;
mod policy;
mod roles;

pub use claims::Claims;
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{TokenCodec, TokenConfig, BEARER_PREFIX, BEARER_SCHEME, RECOMMENDED_SECRET_LEN};
pub use error::{AccessDenied, TokenError};
pub use identity::{Authentication, Identity};
pub use policy::{PolicyTable, PolicyTableBuilder, RoutePolicy};
pub use roles::{RoleSet, ROLE_ADMIN, ROLE_USER};
