// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `run`: Start the server
//! - `validate`: Validate the configuration
//! - `version`: Show version information
//! - `gen-secret`: Generate a signing secret
//! - `issue`: Issue a token for a subject

mod issue;
mod run;
mod secret;
mod validate;
mod version;

pub use issue::issue;
pub use run::run;
pub use secret::gen_secret;
pub use validate::validate;
pub use version::version;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Run(args) => run::run(&cli, args).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Version => version::version(&cli),
        Commands::GenSecret(args) => secret::gen_secret(&cli, args),
        Commands::Issue(args) => issue::issue(&cli, args),
    }
}
