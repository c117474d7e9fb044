// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! Both stages run on every request, gate first:
//!
//! - [`AuthMiddleware`]: bearer token authentication (401 on a bad credential)
//! - [`AuthorizeMiddleware`]: route policy enforcement (403 on denial)

mod authorize;
mod gate;

pub use authorize::{AuthorizeLayer, AuthorizeMiddleware};
pub use gate::{evaluate, AuthLayer, AuthMiddleware, GateOutcome};
