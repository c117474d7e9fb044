// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Executes the `version` command to display version information.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("tokengate - stateless bearer-token authentication");
    println!();
    println!("Version Information:");
    println!("  tokengate-bin: {}", env!("CARGO_PKG_VERSION"));
    println!("  tokengate-api: {}", tokengate_api::VERSION);
    println!();
    println!("Build Information:");
    println!("  Rust Edition: 2024");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("Token Format:");
    println!("  Algorithm:    HS512");
    println!("  Scheme:       {}", tokengate_api::auth::BEARER_SCHEME);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
