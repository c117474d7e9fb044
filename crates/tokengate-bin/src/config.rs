// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and resolve `${VAR}` / `${VAR:default}` placeholders
//! 2. Parse it as YAML, TOML or JSON by extension
//! 3. Apply environment variable overrides
//! 4. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! TOKENGATE_SECRET=...                 token.secret
//! TOKENGATE_HOST=127.0.0.1             host
//! TOKENGATE_PORT=9090                  port
//! TOKENGATE_TOKEN_EXPIRATION_MS=60000  token.expiration_ms
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokengate_api::{ApiConfig, ApiError};
use tracing::{debug, info, warn};

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default prefix of the override variables.
pub const ENV_PREFIX: &str = "TOKENGATE";

// =============================================================================
// ConfigError
// =============================================================================

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file does not exist.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// File I/O error.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("Failed to parse config file '{path}': {message}")]
    Parse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file extension.
    #[error("Unsupported config format '{extension}' (expected yaml, yml, toml or json)")]
    UnsupportedFormat {
        /// The extension found.
        extension: String,
    },

    /// An override variable holds an unusable value.
    #[error("Invalid environment variable {name}: {message}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// Error message.
        message: String,
    },

    /// The loaded configuration is not usable.
    #[error("Validation failed: {0}")]
    Validation(#[from] ApiError),
}

impl ConfigError {
    fn parse(path: &Path, message: impl fmt::Display) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML (`.yaml`, `.yml`).
    Yaml,
    /// TOML (`.toml`).
    Toml,
    /// JSON (`.json`).
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat { extension }),
        }
    }
}

// =============================================================================
// ConfigLoader
// =============================================================================

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Configuration loader.
///
/// Environment access goes through a lookup function so that overrides can be
/// exercised without touching the process environment.
#[derive(Clone)]
pub struct ConfigLoader {
    env_prefix: String,
    env: EnvLookup,
}

impl ConfigLoader {
    /// Creates a loader reading the process environment.
    pub fn new() -> Self {
        Self {
            env_prefix: ENV_PREFIX.to_string(),
            env: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Replaces the environment lookup.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    /// Loads and validates configuration from a file.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<ApiConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let content = self.resolve_placeholders(&content);
        let config = parse_str(&content, format).map_err(|message| ConfigError::parse(path, message))?;

        self.finish(config)
    }

    /// Loads configuration from a file, or from defaults if it does not exist.
    ///
    /// Environment overrides and validation apply either way, so a deployment
    /// can run from `TOKENGATE_SECRET` alone.
    pub fn load_or_default(&self, path: impl AsRef<Path>) -> ConfigResult<ApiConfig> {
        let path = path.as_ref();
        if path.exists() {
            return self.load(path);
        }

        warn!(path = %path.display(), "Configuration file not found, using defaults");
        self.finish(ApiConfig::default())
    }

    /// Loads and validates configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<ApiConfig> {
        let content = self.resolve_placeholders(content);
        let config = parse_str(&content, format).map_err(|message| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            message,
        })?;

        self.finish(config)
    }

    fn finish(&self, mut config: ApiConfig) -> ConfigResult<ApiConfig> {
        self.apply_env_overrides(&mut config)?;
        config.validate()?;

        debug!(
            addr = %config.socket_addr(),
            token_lifetime_ms = config.token.expiration_ms,
            "Configuration loaded"
        );
        Ok(config)
    }

    fn var(&self, suffix: &str) -> (String, Option<String>) {
        let name = format!("{}_{}", self.env_prefix, suffix);
        let value = (self.env)(&name);
        (name, value)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&self, config: &mut ApiConfig) -> ConfigResult<()> {
        if let (_, Some(secret)) = self.var("SECRET") {
            config.token.secret = secret;
        }

        if let (name, Some(value)) = self.var("HOST") {
            config.host = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected an IP address"))?;
        }

        if let (name, Some(value)) = self.var("PORT") {
            config.port = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected valid port number"))?;
        }

        if let (name, Some(value)) = self.var("TOKEN_EXPIRATION_MS") {
            config.token.expiration_ms = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected milliseconds"))?;
        }

        Ok(())
    }

    /// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
    ///
    /// Unknown variables without a default are left in place.
    fn resolve_placeholders(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find('}') else {
                result.push_str(&rest[start..]);
                return result;
            };

            let inner = &after[..end];
            let (name, default) = match inner.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (inner, None),
            };

            match ((self.env)(name), default) {
                (Some(value), _) => result.push_str(&value),
                (None, Some(default)) => result.push_str(default),
                (None, None) => {
                    warn!(variable = name, "Environment variable not found");
                    result.push_str(&rest[start..start + 2 + end + 1]);
                }
            }

            rest = &after[end + 1..];
        }

        result.push_str(rest);
        result
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("env_prefix", &self.env_prefix)
            .finish_non_exhaustive()
    }
}

fn parse_str(content: &str, format: ConfigFormat) -> Result<ApiConfig, String> {
    match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
}

// =============================================================================
// Tests
// =============================================================================
