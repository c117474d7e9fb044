// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::TokenConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// ApiConfig
// =============================================================================

/// Configuration for the API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host address.
    pub host: IpAddr,
    /// Server port.
    pub port: u16,
    /// Token configuration.
    pub token: TokenConfig,
    /// Request timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Graceful shutdown timeout.
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
            token: TokenConfig::default(),
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Sets the host address.
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the token configuration.
    pub fn with_token(mut self, token: TokenConfig) -> Self {
        self.token = token;
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        self.token.validate()?;
        if self.request_timeout.is_zero() {
            return Err(ApiError::configuration("request_timeout must be greater than zero"));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "config-test-secret-key-that-is-long-enough-for-hs512-signing";

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();

        assert_eq!(config.port, 8080);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.token.expiration_ms, 864_000_000);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_default_config_requires_secret() {
        assert!(ApiConfig::default().validate().is_err());
        assert!(ApiConfig::default()
            .with_token(TokenConfig::new(SECRET))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ApiConfig::default()
            .with_token(TokenConfig::new(SECRET))
            .with_request_timeout(Duration::ZERO);

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let json = r#"{ "port": 9090, "request_timeout": "5s", "token": { "secret": "abc" } }"#;
        let config: ApiConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.token.secret, "abc");
        assert_eq!(config.token.expiration_ms, 864_000_000);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_secret_not_serialized() {
        let config = ApiConfig::default().with_token(TokenConfig::new(SECRET));
        let json = serde_json::to_string(&config).unwrap();

        assert!(!json.contains(SECRET));
    }
}
