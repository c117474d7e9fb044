// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # tokengate-bin
//!
//! CLI binary for the tokengate authentication server.
//!
//! - CLI argument parsing with clap
//! - Configuration loading (YAML, TOML, JSON and environment overrides)
//! - Logging initialization
//! - Graceful shutdown handling
//! - Command implementations (run, validate, version, gen-secret, issue)
//!
//! ## Architecture
//!
//! ```text
//!                    ┌─────────────┐
//!                    │   main.rs   │
//!                    └──────┬──────┘
//!                           │
//!                    ┌──────▼──────┐
//!                    │    cli.rs   │
//!                    └──────┬──────┘
//!                           │
//!               ┌───────────┼───────────┐
//!               ▼           ▼           ▼
//!        ┌──────────┐ ┌──────────┐ ┌──────────┐
//!        │ commands │ │  config  │ │ logging  │
//!        └────┬─────┘ └──────────┘ └──────────┘
//!             │
//!      ┌──────┴──────┐
//!      ▼             ▼
//! ┌──────────┐ ┌───────────────┐
//! │ shutdown │ │ tokengate-api │
//! └──────────┘ └───────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! TOKENGATE_SECRET=$(tokengate gen-secret 2>/dev/null) tokengate
//!
//! # Start with a custom config
//! tokengate -c /etc/tokengate/config.yaml
//!
//! # Validate configuration
//! tokengate validate --show-config
//!
//! # Issue a token by hand
//! tokengate issue alice --roles User,Admin
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use config::{ConfigError, ConfigFormat, ConfigLoader, ConfigResult};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use shutdown::ShutdownCoordinator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
