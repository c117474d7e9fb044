// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # tokengate Integration Tests
//!
//! Shared helpers plus the integration suites under `tests/`.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Secrets, instants and hand-signed tokens
//!   - `builders`: Builder for a fully wired test server
//!   - `harness`: In-process router driver and a live TCP server
//!   - `assertions`: Response assertion helpers
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tokengate-tests
//!
//! cargo test -p tokengate-tests --test integration_codec
//! cargo test -p tokengate-tests --test integration_api
//! cargo test -p tokengate-tests --test integration_config
//! cargo test -p tokengate-tests --test integration_server
//! ```
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use tokengate_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let server = TestServerBuilder::new().build();
//!     let token = server.get("/getUserToken", None).await.body;
//!     server.get("/getUserInfo", Some(&token)).await.assert_ok_body("User Information[user]");
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
}
