// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`tokens`]: demo token issuance endpoints
//! - [`info`]: role-protected information endpoints

pub mod info;
pub mod tokens;

pub use info::*;
pub use tokens::*;
