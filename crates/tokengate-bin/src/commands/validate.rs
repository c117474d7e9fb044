// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use tokengate_api::{ApiConfig, PolicyTable, RECOMMENDED_SECRET_LEN};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::config::ConfigLoader;
use crate::error::{BinError, BinResult};

/// Executes the `validate` command to validate configuration.
///
/// A missing file is not an error as long as the environment supplies a
/// usable configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let report = check(cli, &ConfigLoader::new())?;
    print!("{}", report.render(args.format, args.show_config)?);
    Ok(())
}

/// Result of a successful validation.
#[derive(Debug)]
pub(crate) struct ValidationReport {
    source: String,
    config: ApiConfig,
    warnings: Vec<String>,
    routes: usize,
}

pub(crate) fn check(cli: &Cli, loader: &ConfigLoader) -> BinResult<ValidationReport> {
    let config_path = &cli.config;
    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        "defaults + environment".to_string()
    };

    let config = loader
        .load_or_default(config_path)
        .map_err(|e| BinError::from(e).with_context("Configuration validation failed"))?;

    let mut warnings = Vec::new();
    if config.token.secret.len() < RECOMMENDED_SECRET_LEN {
        warnings.push(format!(
            "Token secret is {} bytes, {RECOMMENDED_SECRET_LEN} recommended for HS512",
            config.token.secret.len()
        ));
    }
    if config.host.is_unspecified() {
        warnings.push(format!("Listening on all interfaces ({})", config.host));
    }

    Ok(ValidationReport {
        source,
        config,
        warnings,
        routes: PolicyTable::default_routes().len(),
    })
}

impl ValidationReport {
    fn render(&self, format: OutputFormat, show_config: bool) -> BinResult<String> {
        let config = &self.config;
        let lifetime = humantime_millis(config.token.expiration_ms);

        match format {
            OutputFormat::Text => {
                let mut out = String::new();
                out.push_str(&format!("✓ Configuration is valid: {}\n\n", self.source));
                out.push_str("Summary:\n");
                out.push_str(&format!("  Listen:          {}\n", config.socket_addr()));
                out.push_str(&format!("  Token lifetime:  {lifetime}\n"));
                out.push_str(&format!("  Request timeout: {:?}\n", config.request_timeout));
                out.push_str(&format!("  Policy routes:   {}\n", self.routes));

                if !self.warnings.is_empty() {
                    out.push_str("\nWarnings:\n");
                    for warning in &self.warnings {
                        out.push_str(&format!("  ⚠ {warning}\n"));
                    }
                }

                if show_config {
                    let rendered = serde_json::to_string_pretty(config)
                        .map_err(|e| BinError::runtime(format!("failed to render config: {e}")))?;
                    out.push_str("\nParsed configuration (secret omitted):\n");
                    out.push_str(&rendered);
                    out.push('\n');
                }
                Ok(out)
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": true,
                    "source": self.source,
                    "summary": {
                        "listen": config.socket_addr().to_string(),
                        "token_expiration_ms": config.token.expiration_ms,
                        "policy_routes": self.routes,
                    },
                    "warnings": self.warnings,
                    "config": if show_config { Some(config) } else { None },
                });
                let mut rendered = serde_json::to_string_pretty(&output)
                    .map_err(|e| BinError::runtime(format!("failed to render report: {e}")))?;
                rendered.push('\n');
                Ok(rendered)
            }
        }
    }
}

fn humantime_millis(ms: i64) -> String {
    match u64::try_from(ms) {
        Ok(ms) => humantime_serde::re::humantime::format_duration(std::time::Duration::from_millis(ms))
            .to_string(),
        Err(_) => format!("{ms}ms"),
    }
}

// =============================================================================
// Tests
// =============================================================================
