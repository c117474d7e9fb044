// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Token Codec Integration Tests
//!
//! - `test_round_trip_*`: issue then decode
//! - `test_expiry_*`: lifetime boundaries
//! - `test_tamper_*`: signature integrity
//! - `test_claims_*`: hand-signed claim sets

use chrono::Duration;
use jsonwebtoken::Algorithm;
use tokengate_api::{Identity, RoleSet, TokenCodec, TokenConfig, TokenError};
use tokengate_tests::prelude::*;

fn codec() -> (TokenCodec, std::sync::Arc<tokengate_api::ManualClock>) {
    let clock = ClockFixtures::manual();
    (ClockFixtures::codec(clock.clone()), clock)
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn test_round_trip_preserves_subject_and_role_set() {
    let (codec, _) = codec();

    for (subject, roles) in [
        ("admin", "Admin"),
        ("user", "User"),
        ("carol", "User, Admin"),
        ("dave", ""),
        ("erin", " Auditor ,,Operator "),
    ] {
        let token = codec.issue(subject, RoleSet::parse(roles)).unwrap();
        assert_bearer_token(&token);

        let identity = codec.decode(Some(token.as_str())).unwrap().unwrap();
        assert_eq!(identity, Identity::new(subject, RoleSet::parse(roles)));
    }
}

#[test]
fn test_round_trip_role_order_is_irrelevant() {
    let (codec, _) = codec();

    let a = codec.issue("carol", RoleSet::parse("User,Admin")).unwrap();
    let b = codec.issue("carol", RoleSet::parse("Admin,User")).unwrap();

    assert_eq!(a, b, "issuance is deterministic for a fixed clock");
}

#[test]
fn test_round_trip_across_codec_instances() {
    let clock = ClockFixtures::manual();
    let issuer = ClockFixtures::codec(clock.clone());
    let verifier = ClockFixtures::codec(clock);

    let token = issuer.issue("admin", "Admin").unwrap();
    let identity = verifier.decode(Some(token.as_str())).unwrap().unwrap();
    assert_eq!(identity.subject(), "admin");
}

#[test]
fn test_round_trip_fixture_token() {
    let (codec, _) = codec();

    let identity = codec
        .decode(Some(TokenFixtures::valid("admin", "Admin").as_str()))
        .unwrap()
        .unwrap();
    assert_eq!(identity, Identity::new("admin", RoleSet::from("Admin")));
}

// =============================================================================
// Anonymous
// =============================================================================

#[test]
fn test_no_credential_is_anonymous() {
    let (codec, _) = codec();
    let token = codec.issue("user", "User").unwrap();
    let raw = token.trim_start_matches("Bearer ");

    assert_eq!(codec.decode(None).unwrap(), None);
    assert_eq!(codec.decode(Some("")).unwrap(), None);
    assert_eq!(codec.decode(Some(raw)).unwrap(), None);
    assert_eq!(codec.decode(Some("Basic dXNlcjpwYXNz")).unwrap(), None);
    assert_eq!(codec.decode(Some(format!("bearer {raw}").as_str())).unwrap(), None);
    assert_eq!(codec.decode(Some("Bearer")).unwrap(), None);
}

#[test]
fn test_empty_bearer_is_invalid() {
    let (codec, _) = codec();
    assert!(matches!(
        codec.decode(Some("Bearer ")),
        Err(TokenError::InvalidToken { .. })
    ));
}

// =============================================================================
// Expiry
// =============================================================================

#[test]
fn test_expiry_valid_until_lifetime_elapses() {
    let (codec, clock) = codec();
    let token = codec.issue("admin", "Admin").unwrap();

    for offset in [0, 1, 60_000, LIFETIME_MS / 2, LIFETIME_MS - 1] {
        let now = ClockFixtures::start() + Duration::milliseconds(offset);
        assert!(
            codec.decode_at(Some(token.as_str()), now).unwrap().is_some(),
            "offset {offset}ms should be valid"
        );
    }

    clock.advance(Duration::milliseconds(LIFETIME_MS - 1));
    assert!(codec.decode(Some(token.as_str())).unwrap().is_some());
}

#[test]
fn test_expiry_at_and_after_lifetime() {
    let (codec, clock) = codec();
    let token = codec.issue("admin", "Admin").unwrap();

    for offset in [LIFETIME_MS, LIFETIME_MS + 1, LIFETIME_MS * 2] {
        let now = ClockFixtures::start() + Duration::milliseconds(offset);
        match codec.decode_at(Some(token.as_str()), now) {
            Err(TokenError::ExpiredToken { subject, .. }) => {
                assert_eq!(subject.as_deref(), Some("admin"));
            }
            other => panic!("offset {offset}ms: expected ExpiredToken, got {other:?}"),
        }
    }

    clock.advance(Duration::milliseconds(LIFETIME_MS));
    let err = codec.decode(Some(token.as_str())).unwrap_err();
    assert_eq!(err.kind(), "expired_token");
    assert!(err.to_string().ends_with("User: admin."));
}

#[test]
fn test_expiry_custom_lifetime() {
    let clock = ClockFixtures::manual();
    let codec = TokenCodec::with_clock(
        TokenConfig::new(TEST_SECRET).with_expiration(Duration::seconds(30)),
        clock.clone(),
    )
    .unwrap();

    let token = codec.issue("user", "User").unwrap();
    clock.advance(Duration::seconds(29));
    assert!(codec.decode(Some(token.as_str())).is_ok());

    clock.advance(Duration::seconds(1));
    assert!(matches!(
        codec.decode(Some(token.as_str())),
        Err(TokenError::ExpiredToken { .. })
    ));
}

#[test]
fn test_expiry_issued_between_whole_seconds() {
    let issued_at = ClockFixtures::start() + Duration::milliseconds(500);
    let clock = std::sync::Arc::new(tokengate_api::ManualClock::new(issued_at));
    let codec = ClockFixtures::codec(clock.clone());
    let token = codec.issue("user", "User").unwrap();

    for offset in [0, 250, LIFETIME_MS - 250, LIFETIME_MS - 1] {
        let now = issued_at + Duration::milliseconds(offset);
        assert!(
            codec.decode_at(Some(token.as_str()), now).unwrap().is_some(),
            "offset {offset}ms should be valid"
        );
    }

    clock.set(issued_at + Duration::milliseconds(LIFETIME_MS));
    assert!(matches!(
        codec.decode(Some(token.as_str())),
        Err(TokenError::ExpiredToken { .. })
    ));
}

#[test]
fn test_expiry_fractional_claim_from_other_issuer() {
    let (codec, _) = codec();
    let exp = START_MILLIS as f64 / 1000.0 + 60.75;
    let claims = serde_json::json!({ "sub": "svc", "aut": "User", "exp": exp });
    let token = TokenFixtures::bearer(&TokenFixtures::sign(TEST_SECRET, &claims));

    let before = ClockFixtures::start() + Duration::milliseconds(60_749);
    assert!(codec.decode_at(Some(token.as_str()), before).unwrap().is_some());

    let at = ClockFixtures::start() + Duration::milliseconds(60_750);
    assert!(matches!(
        codec.decode_at(Some(token.as_str()), at),
        Err(TokenError::ExpiredToken { .. })
    ));
}

// =============================================================================
// Tamper
// =============================================================================

#[test]
fn test_tamper_every_signature_character() {
    let (codec, _) = codec();
    let token = codec.issue("admin", "Admin").unwrap();

    for index in 0..TokenFixtures::signature_len(&token) {
        let tampered = TokenFixtures::tamper_signature(&token, index);
        assert_ne!(tampered, token);

        match codec.decode(Some(tampered.as_str())) {
            Err(TokenError::InvalidToken { .. }) => {}
            other => panic!("index {index}: expected InvalidToken, got {other:?}"),
        }
    }
}

#[test]
fn test_tamper_payload_swap() {
    let (codec, _) = codec();
    let user = codec.issue("user", "User").unwrap();
    let admin = codec.issue("admin", "Admin").unwrap();

    let user_parts: Vec<&str> = user.split('.').collect();
    let admin_parts: Vec<&str> = admin.split('.').collect();
    let spliced = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

    assert!(matches!(
        codec.decode(Some(spliced.as_str())),
        Err(TokenError::InvalidToken { .. })
    ));
}

#[test]
fn test_tamper_foreign_key() {
    let (codec, _) = codec();

    assert!(matches!(
        codec.decode(Some(TokenFixtures::foreign("admin", "Admin").as_str())),
        Err(TokenError::InvalidToken { .. })
    ));
}

#[test]
fn test_tamper_garbage() {
    let (codec, _) = codec();

    for garbage in ["Bearer x", "Bearer a.b", "Bearer a.b.c", "Bearer ....", "Bearer ñ.ñ.ñ"] {
        assert!(
            matches!(codec.decode(Some(garbage)), Err(TokenError::InvalidToken { .. })),
            "{garbage}"
        );
    }
}

// =============================================================================
// Claims
// =============================================================================

#[test]
fn test_claims_other_algorithm_rejected() {
    let (codec, _) = codec();
    let claims = TokenFixtures::claims(Some("admin"), Some("Admin"), Some(TokenFixtures::default_exp()));

    for algorithm in [Algorithm::HS256, Algorithm::HS384] {
        let token = TokenFixtures::bearer(&TokenFixtures::sign_with(algorithm, TEST_SECRET, &claims));
        assert!(
            matches!(codec.decode(Some(token.as_str())), Err(TokenError::InvalidToken { .. })),
            "{algorithm:?}"
        );
    }
}

#[test]
fn test_claims_missing_subject() {
    let (codec, _) = codec();

    for sub in [None, Some("")] {
        let claims = TokenFixtures::claims(sub, Some("Admin"), Some(TokenFixtures::default_exp()));
        let token = TokenFixtures::bearer(&TokenFixtures::sign(TEST_SECRET, &claims));

        match codec.decode(Some(token.as_str())) {
            Err(TokenError::MalformedClaims { reason }) => {
                assert!(reason.contains("no user specified"));
            }
            other => panic!("sub {sub:?}: expected MalformedClaims, got {other:?}"),
        }
    }
}

#[test]
fn test_claims_missing_expiry_fails_closed() {
    let (codec, _) = codec();
    let claims = TokenFixtures::claims(Some("admin"), Some("Admin"), None);
    let token = TokenFixtures::bearer(&TokenFixtures::sign(TEST_SECRET, &claims));

    assert!(matches!(
        codec.decode(Some(token.as_str())),
        Err(TokenError::MalformedClaims { .. })
    ));
}

#[test]
fn test_claims_expiry_checked_before_subject() {
    let (codec, _) = codec();
    let claims = TokenFixtures::claims(None, Some("Admin"), Some(START_MILLIS / 1000));
    let token = TokenFixtures::bearer(&TokenFixtures::sign(TEST_SECRET, &claims));

    match codec.decode(Some(token.as_str())) {
        Err(TokenError::ExpiredToken { subject, .. }) => assert!(subject.is_none()),
        other => panic!("expected ExpiredToken, got {other:?}"),
    }
}

#[test]
fn test_claims_missing_roles_is_empty_set() {
    let (codec, _) = codec();
    let claims = TokenFixtures::claims(Some("svc"), None, Some(TokenFixtures::default_exp()));
    let token = TokenFixtures::bearer(&TokenFixtures::sign(TEST_SECRET, &claims));

    let identity = codec.decode(Some(token.as_str())).unwrap().unwrap();
    assert!(identity.roles().is_empty());
}

#[test]
fn test_claims_roles_are_trimmed() {
    let (codec, _) = codec();
    let claims = TokenFixtures::claims(Some("svc"), Some(" User ,, Admin,"), Some(TokenFixtures::default_exp()));
    let token = TokenFixtures::bearer(&TokenFixtures::sign(TEST_SECRET, &claims));

    let identity = codec.decode(Some(token.as_str())).unwrap().unwrap();
    assert_eq!(identity.roles(), &RoleSet::from(["Admin", "User"]));
}

#[test]
fn test_claims_empty_subject_not_issued() {
    let (codec, _) = codec();
    assert!(matches!(
        codec.issue("", "User"),
        Err(TokenError::MalformedClaims { .. })
    ));
}
