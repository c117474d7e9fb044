// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `issue` command.

use tokengate_api::{RoleSet, TokenCodec};

use crate::cli::{Cli, IssueArgs};
use crate::config::ConfigLoader;
use crate::error::{BinError, BinResult};

/// Executes the `issue` command.
///
/// Prints `Bearer <token>` on stdout and the expiry on stderr.
pub fn issue(cli: &Cli, args: IssueArgs) -> BinResult<()> {
    let codec = codec(cli, &ConfigLoader::new())?;
    let token = issue_with(&codec, &args)?;

    println!("{token}");
    if let Some(expires_at) = codec.now().checked_add_signed(codec.lifetime()) {
        eprintln!("Expires: {expires_at}");
    }
    Ok(())
}

fn codec(cli: &Cli, loader: &ConfigLoader) -> BinResult<TokenCodec> {
    let config = loader
        .load_or_default(&cli.config)
        .map_err(|e| BinError::from(e).with_context("Failed to load configuration"))?;
    Ok(TokenCodec::new(config.token)?)
}

fn issue_with(codec: &TokenCodec, args: &IssueArgs) -> BinResult<String> {
    let subject = args.subject.trim();
    if subject.is_empty() {
        return Err(BinError::config("subject must not be empty"));
    }

    let roles = RoleSet::parse(&args.roles);
    tracing::debug!(subject, %roles, "Issuing token");

    Ok(codec.issue(subject, roles)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Utc};
    use tokengate_api::{ManualClock, TokenConfig};

    const SECRET: &str = "issue-test-secret-key-that-is-long-enough-for-hs512-signing!!!!";

    fn args(subject: &str, roles: &str) -> IssueArgs {
        IssueArgs {
            subject: subject.to_string(),
            roles: roles.to_string(),
        }
    }

    #[test]
    fn test_issue_round_trips_through_codec() {
        let codec = TokenCodec::new(TokenConfig::new(SECRET)).unwrap();

        let token = issue_with(&codec, &args("alice", "User,Admin")).unwrap();
        let identity = codec.decode(Some(token.as_str())).unwrap().unwrap();

        assert_eq!(identity.subject(), "alice");
        assert!(identity.has_role("User"));
        assert!(identity.has_role("Admin"));
    }

    #[test]
    fn test_issue_without_roles() {
        let codec = TokenCodec::new(TokenConfig::new(SECRET)).unwrap();

        let token = issue_with(&codec, &args("bob", "")).unwrap();
        let identity = codec.decode(Some(token.as_str())).unwrap().unwrap();

        assert!(identity.roles().is_empty());
    }

    #[test]
    fn test_empty_subject_rejected() {
        let codec = TokenCodec::new(TokenConfig::new(SECRET)).unwrap();
        assert!(issue_with(&codec, &args("  ", "User")).is_err());
    }

    #[test]
    fn test_expiry_out_of_range_is_reported() {
        let clock = Arc::new(ManualClock::new(DateTime::<Utc>::MAX_UTC - Duration::days(1)));
        let codec = TokenCodec::with_clock(TokenConfig::new(SECRET), clock).unwrap();

        let err = issue_with(&codec, &args("alice", "User")).unwrap_err();
        assert!(matches!(err, BinError::Token(_)));
        assert_eq!(err.exit_code(), crate::error::exit_status::TOKEN);
    }

    #[test]
    fn test_codec_from_environment() {
        let cli = Cli::parse_from(["tokengate", "-c", "/nonexistent/tokengate.yaml", "issue", "x"]);
        let loader = ConfigLoader::new().with_env_lookup(|name| {
            (name == "TOKENGATE_TOKEN_EXPIRATION_MS").then(|| "60000".to_string())
        });
        assert!(codec(&cli, &loader).is_err());

        let loader = ConfigLoader::new().with_env_lookup(|name| match name {
            "TOKENGATE_SECRET" => Some(SECRET.to_string()),
            "TOKENGATE_TOKEN_EXPIRATION_MS" => Some("60000".to_string()),
            _ => None,
        });
        let codec = codec(&cli, &loader).unwrap();
        assert_eq!(codec.lifetime(), chrono::Duration::milliseconds(60_000));
    }
}
