// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `gen-secret` command.

use std::fs;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use crate::cli::{Cli, GenSecretArgs};
use crate::error::{BinError, BinResult};

/// Shortest secret the command will produce, in raw bytes.
const MIN_SECRET_BYTES: usize = 32;

/// Executes the `gen-secret` command.
pub fn gen_secret(_cli: &Cli, args: GenSecretArgs) -> BinResult<()> {
    let secret = generate_secret(args.bytes)?;

    if let Some(path) = &args.output {
        fs::write(path, &secret)
            .map_err(|e| BinError::io(format!("Failed to write secret file: {e}")))?;
        eprintln!("Secret written to: {}", path.display());
    } else {
        println!("{secret}");
    }

    eprintln!();
    eprintln!("Store this secret securely. Use it as:");
    eprintln!("  - token.secret in the configuration file");
    eprintln!("  - export TOKENGATE_SECRET=<secret>");

    Ok(())
}

/// Returns `bytes` random bytes encoded as unpadded URL-safe base64.
pub(crate) fn generate_secret(bytes: usize) -> BinResult<String> {
    if bytes < MIN_SECRET_BYTES {
        return Err(BinError::config(format!(
            "secret must be at least {MIN_SECRET_BYTES} bytes, got {bytes}"
        )));
    }

    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    Ok(URL_SAFE_NO_PAD.encode(buf))
}
