// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Configuration Integration Tests
//!
//! Configuration files loaded by the binary's loader, fed into the server.
//!
//! - `test_load_*`: file formats and overrides
//! - `test_wiring_*`: loaded configuration driving a server

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokengate_api::{ApiServer, InMemoryAuditSink, TokenCodec};
use tokengate_bin::{ConfigError, ConfigLoader};
use tokengate_tests::common::temp_test_dir;
use tokengate_tests::prelude::*;

fn loader(vars: &[(&str, &str)]) -> ConfigLoader {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ConfigLoader::new().with_env_lookup(move |name| vars.get(name).cloned())
}

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write config");
    path
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_same_config_in_every_format() {
    let dir = temp_test_dir("tokengate-config");

    let yaml = write(
        &dir,
        "gate.yaml",
        &format!(
            "host: 127.0.0.1\nport: 9100\nrequest_timeout: 5s\ntoken:\n  secret: {TEST_SECRET}\n  expiration_ms: 3600000\n"
        ),
    );
    let toml = write(
        &dir,
        "gate.toml",
        &format!(
            "host = \"127.0.0.1\"\nport = 9100\nrequest_timeout = \"5s\"\n\n[token]\nsecret = \"{TEST_SECRET}\"\nexpiration_ms = 3600000\n"
        ),
    );
    let json = write(
        &dir,
        "gate.json",
        &format!(
            r#"{{"host":"127.0.0.1","port":9100,"request_timeout":"5s","token":{{"secret":"{TEST_SECRET}","expiration_ms":3600000}}}}"#
        ),
    );

    for path in [yaml, toml, json] {
        let config = loader(&[]).load(&path).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9100", "{path:?}");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.token.expiration_ms, 3_600_000);
        assert_eq!(config.token.secret, TEST_SECRET);
    }
}

#[test]
fn test_load_env_overrides_win() {
    let dir = temp_test_dir("tokengate-config");
    let path = write(&dir, "gate.yaml", "port: 9100\ntoken:\n  secret: file-secret-that-is-long-enough-to-pass-validation\n");

    let config = loader(&[("TOKENGATE_SECRET", TEST_SECRET), ("TOKENGATE_PORT", "9200")])
        .load(&path)
        .unwrap();

    assert_eq!(config.port, 9200);
    assert_eq!(config.token.secret, TEST_SECRET);
}

#[test]
fn test_load_rejects_weak_secret() {
    let dir = temp_test_dir("tokengate-config");
    let path = write(&dir, "gate.yaml", "token:\n  secret: too-short\n");

    assert!(matches!(
        loader(&[]).load(&path),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn test_load_rejects_unrepresentable_lifetime() {
    let dir = temp_test_dir("tokengate-config");
    let path = write(&dir, "gate.yaml", "port: 9100\n");

    let result = loader(&[
        ("TOKENGATE_SECRET", TEST_SECRET),
        ("TOKENGATE_TOKEN_EXPIRATION_MS", "10000000000000000"),
    ])
    .load(&path);

    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn test_load_unsupported_extension() {
    let dir = temp_test_dir("tokengate-config");
    let path = write(&dir, "gate.ini", "secret=x\n");

    assert!(matches!(
        loader(&[]).load(&path),
        Err(ConfigError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_load_secret_from_placeholder() {
    let dir = temp_test_dir("tokengate-config");
    let path = write(&dir, "gate.yaml", "token:\n  secret: ${GATE_KEY}\n");

    let config = loader(&[("GATE_KEY", TEST_SECRET)]).load(&path).unwrap();
    assert_eq!(config.token.secret, TEST_SECRET);
}

// =============================================================================
// Wiring
// =============================================================================

#[tokio::test]
async fn test_wiring_loaded_lifetime_drives_server() {
    let config = loader(&[
        ("TOKENGATE_SECRET", TEST_SECRET),
        ("TOKENGATE_TOKEN_EXPIRATION_MS", "60000"),
    ])
    .load_or_default("/nonexistent/tokengate.yaml")
    .unwrap();

    let clock = ClockFixtures::manual();
    let audit = InMemoryAuditSink::new();
    let server = ApiServer::builder()
        .config(config.clone())
        .clock(clock.clone())
        .audit_sink(Arc::new(audit.clone()))
        .build()
        .unwrap();
    let server = TestServer::new(server, clock.clone(), audit);

    let token = server.fetch_token("/getUserToken").await;
    server
        .get("/getUserInfo", Some(&token))
        .await
        .assert_ok_body("User Information[user]");

    clock.advance(chrono::Duration::seconds(60));
    server.get("/getUserInfo", Some(&token)).await.assert_unauthorized();

    // A codec built from the same configuration accepts the server's tokens.
    let token = server.fetch_token("/getAdminToken").await;
    let codec = TokenCodec::with_clock(config.token, clock).unwrap();
    assert_eq!(
        codec.decode(Some(token.as_str())).unwrap().unwrap().subject(),
        "admin"
    );
    assert_eq!(server.audit().len(), 3);
}
