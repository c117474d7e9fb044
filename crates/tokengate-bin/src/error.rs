// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Failures surfaced by the `tokengate` command line.
//!
//! Every failure maps to a process exit status so that scripts provisioning
//! the gateway can tell a bad deployment apart from a crashed server.

use thiserror::Error;
use tokengate_api::{ApiError, TokenError};

use crate::config::ConfigError;

/// Result alias used by every command.
pub type BinResult<T> = Result<T, BinError>;

/// Exit status for each failure class.
pub mod exit_status {
    /// Bad or missing configuration, including CLI arguments.
    pub const CONFIG: i32 = 1;
    /// Process setup failed (signal handlers, log subscriber).
    pub const STARTUP: i32 = 2;
    /// The server stopped abnormally.
    pub const SERVER: i32 = 3;
    /// Reading or writing a local file failed.
    pub const IO: i32 = 4;
    /// The HTTP layer failed to bind or serve.
    pub const API: i32 = 5;
    /// A token could not be issued.
    pub const TOKEN: i32 = 6;
}

/// A command failure.
#[derive(Debug, Error)]
pub enum BinError {
    /// Invalid settings or arguments detected by a command.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Could not prepare the process to serve.
    #[error("startup failed: {0}")]
    Initialization(String),

    /// The running server or one of its tasks failed.
    #[error("server failure: {0}")]
    Runtime(String),

    /// Local file access failed.
    #[error("file access failed: {0}")]
    Io(String),

    /// Failure from the HTTP layer, passed through unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The configuration file or environment could not be loaded.
    #[error("cannot load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Token issuance failed.
    #[error("cannot issue token: {0}")]
    Token(#[from] TokenError),

    /// Another failure with a note on what was being attempted.
    #[error("{context}: {source}")]
    WithContext {
        /// What the command was doing.
        context: String,
        /// Why it failed.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Shorthand for [`BinError::Configuration`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Shorthand for [`BinError::Initialization`].
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Shorthand for [`BinError::Runtime`].
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Shorthand for [`BinError::Io`].
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Wraps the error with what was being attempted.
    ///
    /// The exit status is that of the wrapped error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Process exit status, see [`exit_status`].
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Config(_) => exit_status::CONFIG,
            Self::Api(ApiError::Configuration { .. }) => exit_status::CONFIG,
            Self::Initialization(_) => exit_status::STARTUP,
            Self::Runtime(_) => exit_status::SERVER,
            Self::Io(_) => exit_status::IO,
            Self::Api(_) => exit_status::API,
            Self::Token(_) => exit_status::TOKEN,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Reporting
// =============================================================================

/// Writes the error and each of its causes to stderr, one per line.
pub fn report_error(error: &BinError) {
    eprintln!("tokengate: {error}");

    let causes = std::iter::successors(std::error::Error::source(error), |e| e.source());
    for cause in causes {
        eprintln!("  caused by: {cause}");
    }
}

/// Reports the error and terminates with its exit status.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================
