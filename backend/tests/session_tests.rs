//! Tests for dashboard session reading
//!
//! The dashboard reads bearer-token claims without verifying signatures
//! to drive display and submit-button gating; expiry always fails closed
//! and redirects to login. The backend validates every request on its
//! own, so nothing here is an authorization boundary.

use jsonwebtoken::{encode, EncodingKey, Header};
use proptest::prelude::*;
use serde_json::{json, Value};

use shared::models::Role;
use shared::session::{decode_token, extract_identity, is_expired_at, SessionIdentity};

/// Sign a claims payload the way the backend does
fn signed_token(claims: &Value) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate role claims, both platform roles and foreign strings
fn role_string_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("admin".to_string()),
        Just("manager".to_string()),
        Just("tutor".to_string()),
        "[a-z]{3,10}",
    ]
}

/// Generate plausible epoch-second claims
fn epoch_strategy() -> impl Strategy<Value = u64> {
    1_000_000_000u64..4_000_000_000
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A freshly signed token is always readable without the key
    #[test]
    fn test_signed_tokens_always_readable(
        sub in "[a-z0-9-]{8,20}",
        role in role_string_strategy(),
        exp in epoch_strategy(),
    ) {
        let token = signed_token(&json!({"sub": sub, "role": role, "exp": exp}));
        let identity = extract_identity(&token).unwrap();
        prop_assert_eq!(identity.subject.as_deref(), Some(sub.as_str()));
        prop_assert_eq!(identity.role.as_deref(), Some(role.as_str()));
    }

    /// A token is live strictly before its expiry claim and dead after
    #[test]
    fn test_expiry_boundary(exp in epoch_strategy()) {
        let token = signed_token(&json!({"exp": exp}));
        let exp = exp as f64;
        prop_assert!(!is_expired_at(&token, exp - 1.0));
        prop_assert!(!is_expired_at(&token, exp));
        prop_assert!(is_expired_at(&token, exp + 1.0));
    }

    /// Once expired, a token stays expired at every later clock reading
    #[test]
    fn test_expiry_monotone(
        exp in epoch_strategy(),
        offset in 1u64..1_000_000,
    ) {
        let token = signed_token(&json!({"exp": exp}));
        let after = exp as f64 + 1.0;
        prop_assert!(is_expired_at(&token, after));
        prop_assert!(is_expired_at(&token, after + offset as f64));
    }

    /// Tokens without an expiry claim are expired at any clock reading
    #[test]
    fn test_missing_expiry_fails_closed(now in epoch_strategy()) {
        let token = signed_token(&json!({"sub": "u-1"}));
        prop_assert!(is_expired_at(&token, now as f64));
    }

    /// Arbitrary stored strings never panic the reader, and anything
    /// unreadable counts as expired
    #[test]
    fn test_garbage_never_panics(garbage in ".{0,60}") {
        let decoded = decode_token(&garbage);
        if decoded.is_err() {
            prop_assert_eq!(extract_identity(&garbage), None);
            prop_assert!(is_expired_at(&garbage, 0.0));
        }
    }
}

// ============================================================================
// Unit Tests: Token Shape
// ============================================================================

mod token_shape {
    use super::*;

    #[test]
    fn three_segments_required() {
        assert!(decode_token("").is_err());
        assert!(decode_token("single").is_err());
        assert!(decode_token("two.segments").is_err());
        assert!(decode_token("a.b.c.d").is_err());
    }

    #[test]
    fn signature_is_never_checked() {
        let token = signed_token(&json!({"sub": "u-9", "exp": 4_000_000_000u64}));
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[2] = "tampered";
        let tampered = parts.join(".");

        let identity = extract_identity(&tampered).unwrap();
        assert_eq!(identity.subject.as_deref(), Some("u-9"));
    }

    #[test]
    fn signing_key_is_irrelevant_to_reading() {
        let claims = json!({"sub": "u-3", "exp": 4_000_000_000u64});
        let one = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"key-one")).unwrap();
        let two = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"key-two")).unwrap();
        assert_eq!(extract_identity(&one), extract_identity(&two));
    }
}

// ============================================================================
// Unit Tests: Login Redirect Decisions
// ============================================================================

mod expiry_decisions {
    use super::*;

    #[test]
    fn live_token_keeps_the_session() {
        let token = signed_token(&json!({"exp": 4_102_444_800u64}));
        assert!(!is_expired_at(&token, 1_700_000_000.0));
    }

    #[test]
    fn malformed_storage_forces_login() {
        // Typical localStorage residue after a bad write
        for stored in ["", "null", "undefined", "not-a-token", "a.b"] {
            assert!(is_expired_at(stored, 1_700_000_000.0), "{stored:?} must force login");
        }
    }

    #[test]
    fn expired_token_forces_login() {
        let token = signed_token(&json!({"exp": 1_600_000_000u64}));
        assert!(is_expired_at(&token, 1_700_000_000.0));
    }
}

// ============================================================================
// Unit Tests: Role Gating Parity
// ============================================================================

mod role_gating {
    use super::*;

    #[test]
    fn tutor_sessions_are_read_only() {
        let token = signed_token(&json!({"role": "tutor"}));
        assert!(extract_identity(&token).unwrap().is_read_only());
    }

    #[test]
    fn gating_matches_backend_role_rules() {
        for role in [Role::Admin, Role::Manager, Role::Tutor] {
            let token = signed_token(&json!({"role": role.as_str()}));
            let identity = extract_identity(&token).unwrap();
            assert_eq!(identity.is_read_only(), !role.can_mutate());
            assert_eq!(identity.role_enum(), Some(role));
        }
    }

    #[test]
    fn unknown_roles_are_left_to_the_backend() {
        let token = signed_token(&json!({"role": "visitor"}));
        let identity = extract_identity(&token).unwrap();
        assert_eq!(identity.role_enum(), None);
        assert!(!identity.is_read_only());
    }

    #[test]
    fn provider_stamped_claims_still_gate() {
        let token = signed_token(&json!({
            "https://hospitality-school.app/claims/role": "tutor",
        }));
        assert!(extract_identity(&token).unwrap().is_read_only());
    }

    #[test]
    fn platform_claims_override_provider_claims() {
        let token = signed_token(&json!({
            "role": "manager",
            "https://hospitality-school.app/claims/role": "tutor",
        }));
        let identity = extract_identity(&token).unwrap();
        assert_eq!(identity.role.as_deref(), Some("manager"));
        assert!(!identity.is_read_only());
    }

    #[test]
    fn default_identity_is_not_gated() {
        assert!(!SessionIdentity::default().is_read_only());
        assert!(!SessionIdentity::default().is_active());
    }

    #[test]
    fn status_claim_drives_active_flag() {
        let active = signed_token(&json!({"status": "active"}));
        assert!(extract_identity(&active).unwrap().is_active());

        let disabled = signed_token(&json!({"status": "inactive"}));
        assert!(!extract_identity(&disabled).unwrap().is_active());
    }
}
