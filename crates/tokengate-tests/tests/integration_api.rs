// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # API Integration Tests
//!
//! End-to-end request handling through the full middleware stack.
//!
//! - `test_issue_*`: issuance endpoints
//! - `test_auth_*`: authentication gate outcomes
//! - `test_rbac_*`: route policy enforcement
//! - `test_audit_*`: audit records

use axum::http::{HeaderValue, Method, StatusCode};
use chrono::Duration;
use tokengate_api::{AuditKind, PolicyTable, RoleSet};
use tokengate_tests::prelude::*;

// =============================================================================
// Issuance
// =============================================================================

#[tokio::test]
async fn test_issue_user_and_admin_tokens() {
    let server = TestServerBuilder::new().build();
    let codec = ClockFixtures::codec(ClockFixtures::manual());

    let user = server.fetch_token("/getUserToken").await;
    assert_bearer_token(&user);
    let identity = codec.decode(Some(user.as_str())).unwrap().unwrap();
    assert_eq!(identity.subject(), "user");
    assert_eq!(identity.roles(), &RoleSet::from("User"));

    let admin = server.fetch_token("/getAdminToken").await;
    let identity = codec.decode(Some(admin.as_str())).unwrap().unwrap();
    assert_eq!(identity.subject(), "admin");
    assert_eq!(identity.roles(), &RoleSet::from("Admin"));
}

#[tokio::test]
async fn test_issue_only_via_get() {
    let server = TestServerBuilder::new().build();

    for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
        server
            .send(method.clone(), "/getUserToken", None)
            .await
            .assert_forbidden();
        server
            .send(method, "/getAdminToken", None)
            .await
            .assert_forbidden();
    }
}

// =============================================================================
// Authentication Gate
// =============================================================================

#[tokio::test]
async fn test_auth_admin_scenario() {
    let server = TestServerBuilder::new().build();

    let admin = server.fetch_token("/getAdminToken").await;
    server
        .get("/getAdminInfo", Some(&admin))
        .await
        .assert_ok_body("Admin Information[admin]");

    server.clock().advance(Duration::milliseconds(LIFETIME_MS));
    server.get("/getAdminInfo", Some(&admin)).await.assert_unauthorized();
}

#[tokio::test]
async fn test_auth_anonymous_on_permit_all() {
    let server = TestServerBuilder::new().build();

    let response = server.get("/getUserToken", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = server.get("/getUserToken", Some("Basic dXNlcjpwYXNz")).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_auth_anonymous_on_protected_is_forbidden() {
    let server = TestServerBuilder::new().build();

    server.get("/getUserInfo", None).await.assert_forbidden();
    server.get("/getAdminInfo", None).await.assert_forbidden();
    server
        .get("/getUserInfo", Some("Token abc"))
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn test_auth_rejected_tokens_are_unauthorized_everywhere() {
    let server = TestServerBuilder::new().build();
    let user = server.fetch_token("/getUserToken").await;

    let rejected = [
        "Bearer ".to_string(),
        "Bearer not-a-token".to_string(),
        TokenFixtures::tamper_signature(&user, 0),
        TokenFixtures::foreign("user", "User"),
        TokenFixtures::bearer(&TokenFixtures::sign(
            TEST_SECRET,
            &TokenFixtures::claims(None, Some("User"), Some(TokenFixtures::default_exp())),
        )),
    ];

    for token in &rejected {
        for path in ["/getUserToken", "/getUserInfo", "/getAdminInfo", "/unknown"] {
            let response = server.get(path, Some(token)).await;
            assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{path} with {token}");
            response.assert_unauthorized();
        }
    }
}

#[tokio::test]
async fn test_auth_non_utf8_header_is_unauthorized() {
    let server = TestServerBuilder::new().build();
    let value = HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap();

    server
        .send_header(Method::GET, "/getUserInfo", Some(value))
        .await
        .assert_unauthorized();
}

#[tokio::test]
async fn test_auth_expiry_boundary() {
    let server = TestServerBuilder::new().build();
    let user = server.fetch_token("/getUserToken").await;

    server.clock().advance(Duration::milliseconds(LIFETIME_MS - 1));
    server
        .get("/getUserInfo", Some(&user))
        .await
        .assert_ok_body("User Information[user]");

    server.clock().advance(Duration::milliseconds(1));
    server.get("/getUserInfo", Some(&user)).await.assert_unauthorized();
}

// =============================================================================
// RBAC
// =============================================================================

#[tokio::test]
async fn test_rbac_default_table() {
    let server = TestServerBuilder::new().build();
    let user = server.fetch_token("/getUserToken").await;
    let admin = server.fetch_token("/getAdminToken").await;

    server
        .get("/getUserInfo", Some(&user))
        .await
        .assert_ok_body("User Information[user]");
    server
        .get("/getUserInfo", Some(&admin))
        .await
        .assert_ok_body("User Information[admin]");
    server
        .get("/getAdminInfo", Some(&admin))
        .await
        .assert_ok_body("Admin Information[admin]");
    server.get("/getAdminInfo", Some(&user)).await.assert_forbidden();
}

#[tokio::test]
async fn test_rbac_multi_role_token() {
    let server = TestServerBuilder::new().build();
    let both = TokenFixtures::valid("carol", "User,Admin");
    let none = TokenFixtures::valid("dave", "");
    let other = TokenFixtures::valid("erin", "Auditor");

    server
        .get("/getAdminInfo", Some(&both))
        .await
        .assert_ok_body("Admin Information[carol]");
    server.get("/getUserInfo", Some(&none)).await.assert_forbidden();
    server.get("/getUserInfo", Some(&other)).await.assert_forbidden();
}

#[tokio::test]
async fn test_rbac_default_deny() {
    let server = TestServerBuilder::new().build();
    let admin = server.fetch_token("/getAdminToken").await;

    for (method, path) in [
        (Method::GET, "/"),
        (Method::GET, "/getAdminInfo/"),
        (Method::GET, "/getadmininfo"),
        (Method::GET, "/getAdminInfo/extra"),
        (Method::POST, "/getAdminInfo"),
        (Method::HEAD, "/getUserInfo"),
    ] {
        server
            .send(method.clone(), path, Some(&admin))
            .await
            .assert_forbidden();
        server.send(method, path, None).await.assert_forbidden();
    }
}

#[tokio::test]
async fn test_rbac_custom_table() {
    let policy = PolicyTable::builder()
        .permit_all(Method::GET, "/getUserToken")
        .require_any_of(Method::GET, "/getUserInfo", ["Admin"])
        .deny_all(Method::GET, "/getAdminInfo")
        .build();
    let server = TestServerBuilder::new().policy(policy).build();

    let user = server.fetch_token("/getUserToken").await;
    let admin = TokenFixtures::valid("admin", "Admin");

    server.get("/getUserInfo", Some(&user)).await.assert_forbidden();
    server
        .get("/getUserInfo", Some(&admin))
        .await
        .assert_ok_body("User Information[admin]");
    server.get("/getAdminInfo", Some(&admin)).await.assert_forbidden();
    server.get("/getAdminToken", None).await.assert_forbidden();
}

// =============================================================================
// Audit
// =============================================================================

#[tokio::test]
async fn test_audit_records_each_outcome() {
    let server = TestServerBuilder::new().build();

    let user = server.fetch_token("/getUserToken").await;
    server.get("/getAdminInfo", Some(&user)).await.assert_forbidden();
    server
        .get("/getUserInfo", Some("Bearer garbage"))
        .await
        .assert_unauthorized();

    let audit = server.audit();
    assert_eq!(audit.len(), 3);

    let issued = audit.events_of(AuditKind::TokenIssued);
    assert_eq!(issued.len(), 1);
    assert_eq!(issued[0].subject.as_deref(), Some("user"));
    assert_eq!(issued[0].path, "/getUserToken");

    let denied = audit.events_of(AuditKind::AccessDenied);
    assert_eq!(denied.len(), 1);
    assert_eq!(denied[0].subject.as_deref(), Some("user"));
    assert_eq!(denied[0].path, "/getAdminInfo");

    let rejected = audit.events_of(AuditKind::AuthenticationRejected);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].method, "GET");
    assert!(rejected[0].subject.is_none());
}

#[tokio::test]
async fn test_audit_expired_carries_subject() {
    let server = TestServerBuilder::new().build();
    let admin = server.fetch_token("/getAdminToken").await;
    server.audit().clear();

    server.clock().advance(Duration::days(11));
    server.get("/getAdminInfo", Some(&admin)).await.assert_unauthorized();

    let rejected = server.audit().events_of(AuditKind::AuthenticationRejected);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].subject.as_deref(), Some("admin"));
    assert_eq!(rejected[0].reason.as_deref(), Some("expired_token"));
}
