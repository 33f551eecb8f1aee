//! Client-side session claim reading
//!
//! Reads the payload segment of a stored bearer token to drive UI gating
//! (hiding controls from read-only roles) and pre-emptive redirect to login
//! on expiry. No signature verification happens here and none of this is an
//! authorization boundary; the backend validates every request
//! independently.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::Role;

/// Claim names checked for each identity field, short form first.
/// The long-form URIs are what an external identity provider stamps into
/// its tokens; the platform's own tokens use the short form.
const SUBJECT_CLAIMS: &[&str] = &["sub", "https://hospitality-school.app/claims/sub"];
const ROLE_CLAIMS: &[&str] = &["role", "https://hospitality-school.app/claims/role"];
const NAME_CLAIMS: &[&str] = &["name", "https://hospitality-school.app/claims/name"];
const EMAIL_CLAIMS: &[&str] = &["email", "https://hospitality-school.app/claims/email"];
const STATUS_CLAIMS: &[&str] = &["status", "https://hospitality-school.app/claims/status"];

/// Session token reading failures, all treated as "no session"
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("malformed session token: {0}")]
    Malformed(&'static str),
}

/// Decode a bearer token's payload segment without verifying anything.
///
/// The token must have exactly three dot-separated segments; only the
/// middle one is decoded, tolerating both padded and unpadded base64url.
/// Header and signature bytes are never inspected.
pub fn decode_token(token: &str) -> Result<Value, SessionError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(SessionError::Malformed(
            "expected three dot-separated segments",
        ));
    }

    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| SessionError::Malformed("payload is not valid base64url"))?;

    serde_json::from_slice(&bytes).map_err(|_| SessionError::Malformed("payload is not valid JSON"))
}

/// Expiry claim in epoch seconds, if the payload carries one
pub fn expiry_seconds(claims: &Value) -> Option<f64> {
    claims.get("exp").and_then(Value::as_f64)
}

/// Expiry check against an explicit clock reading (epoch seconds).
///
/// Fail-closed: a token that cannot be decoded, or that carries no expiry
/// claim, counts as expired. Otherwise expired iff `exp < now`.
pub fn is_expired_at(token: &str, now_secs: f64) -> bool {
    match decode_token(token) {
        Ok(claims) => match expiry_seconds(&claims) {
            Some(exp) => exp < now_secs,
            None => true,
        },
        Err(_) => true,
    }
}

/// Expiry check against the system clock
#[cfg(not(target_arch = "wasm32"))]
pub fn is_expired(token: &str) -> bool {
    match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
        Ok(now) => is_expired_at(token, now.as_secs_f64()),
        Err(_) => true,
    }
}

/// Identity fields read from a session token for display and UI gating
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionIdentity {
    pub subject: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

impl SessionIdentity {
    /// Role claim parsed against the platform's role set
    pub fn role_enum(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    /// True when the role may not submit mutations. Drives submit-button
    /// gating only; unknown roles are left to the backend to reject.
    pub fn is_read_only(&self) -> bool {
        matches!(self.role_enum(), Some(role) if !role.can_mutate())
    }

    /// True when the account status claim says the account is active
    pub fn is_active(&self) -> bool {
        matches!(self.status.as_deref(), Some(status) if status.eq_ignore_ascii_case("active"))
    }
}

fn first_string_claim(claims: &Value, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| claims.get(*name).and_then(Value::as_str))
        .map(str::to_string)
}

/// Pull the identity fields out of a token, `None` when decoding fails.
///
/// Each field is resolved through its claim-name table in order, so a
/// short-form claim wins over the namespaced form when both are present.
pub fn extract_identity(token: &str) -> Option<SessionIdentity> {
    let claims = decode_token(token).ok()?;
    Some(SessionIdentity {
        subject: first_string_claim(&claims, SUBJECT_CLAIMS),
        role: first_string_claim(&claims, ROLE_CLAIMS),
        name: first_string_claim(&claims, NAME_CLAIMS),
        email: first_string_claim(&claims, EMAIL_CLAIMS),
        status: first_string_claim(&claims, STATUS_CLAIMS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE;
    use serde_json::json;

    fn token_with_payload(payload: &Value) -> String {
        let encoded = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("header.{encoded}.signature")
    }

    // ========================================================================
    // Decoding Tests
    // ========================================================================

    #[test]
    fn test_decode_token_reads_payload() {
        let token = token_with_payload(&json!({"sub": "u-1", "role": "manager"}));
        let claims = decode_token(&token).unwrap();
        assert_eq!(claims["sub"], "u-1");
        assert_eq!(claims["role"], "manager");
    }

    #[test]
    fn test_decode_token_tolerates_padding() {
        // {"a":1} encodes to a length that needs padding
        let padded = URL_SAFE.encode(json!({"a": 1}).to_string());
        assert!(padded.ends_with('='));
        let token = format!("h.{padded}.s");
        let claims = decode_token(&token).unwrap();
        assert_eq!(claims["a"], 1);
    }

    #[test]
    fn test_decode_token_ignores_header_and_signature() {
        let payload = URL_SAFE_NO_PAD.encode(json!({"sub": "u-2"}).to_string());
        let token = format!("!!not-base64!!.{payload}.@@garbage@@");
        let claims = decode_token(&token).unwrap();
        assert_eq!(claims["sub"], "u-2");
    }

    #[test]
    fn test_decode_token_requires_three_segments() {
        assert!(decode_token("").is_err());
        assert!(decode_token("only-one").is_err());
        assert!(decode_token("two.parts").is_err());
        assert!(decode_token("a.b.c.d").is_err());
    }

    #[test]
    fn test_decode_token_rejects_bad_payload() {
        // Not base64url
        assert!(decode_token("h.???.s").is_err());
        // Valid base64url, not JSON
        let not_json = URL_SAFE_NO_PAD.encode("hello world");
        assert!(decode_token(&format!("h.{not_json}.s")).is_err());
    }

    #[test]
    fn test_decode_real_signed_token_without_verification() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let claims = json!({"sub": "user-42", "role": "tutor", "exp": 4_102_444_800u64});
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"a-key-this-module-never-sees"),
        )
        .unwrap();

        let decoded = decode_token(&token).unwrap();
        assert_eq!(decoded["sub"], "user-42");
        assert_eq!(decoded["role"], "tutor");
    }

    // ========================================================================
    // Expiry Tests
    // ========================================================================

    #[test]
    fn test_is_expired_at_boundary() {
        let now = 1_700_000_000.0;
        let expired = token_with_payload(&json!({"exp": 1_699_999_999.0}));
        let valid = token_with_payload(&json!({"exp": 1_700_000_001.0}));
        assert!(is_expired_at(&expired, now));
        assert!(!is_expired_at(&valid, now));
        // exp == now is not yet expired
        let boundary = token_with_payload(&json!({"exp": 1_700_000_000.0}));
        assert!(!is_expired_at(&boundary, now));
    }

    #[test]
    fn test_is_expired_fail_closed() {
        let now = 1_700_000_000.0;
        assert!(is_expired_at("not a token", now));
        assert!(is_expired_at("a.b", now));
        assert!(is_expired_at("", now));
        // Decodes fine but carries no expiry claim
        let no_exp = token_with_payload(&json!({"sub": "u-1"}));
        assert!(is_expired_at(&no_exp, now));
    }

    #[test]
    fn test_is_expired_uses_system_clock() {
        // Year 2100, clearly in the future
        let valid = token_with_payload(&json!({"exp": 4_102_444_800u64}));
        assert!(!is_expired(&valid));
        let expired = token_with_payload(&json!({"exp": 1}));
        assert!(is_expired(&expired));
    }

    // ========================================================================
    // Identity Extraction Tests
    // ========================================================================

    #[test]
    fn test_extract_identity_short_form() {
        let token = token_with_payload(&json!({
            "sub": "u-7",
            "role": "manager",
            "name": "Alex Chef",
            "email": "alex@school.test",
            "status": "active",
        }));
        let identity = extract_identity(&token).unwrap();
        assert_eq!(identity.subject.as_deref(), Some("u-7"));
        assert_eq!(identity.role.as_deref(), Some("manager"));
        assert_eq!(identity.name.as_deref(), Some("Alex Chef"));
        assert_eq!(identity.email.as_deref(), Some("alex@school.test"));
        assert!(identity.is_active());
    }

    #[test]
    fn test_extract_identity_namespaced_fallback() {
        let token = token_with_payload(&json!({
            "https://hospitality-school.app/claims/role": "tutor",
            "https://hospitality-school.app/claims/email": "t@school.test",
        }));
        let identity = extract_identity(&token).unwrap();
        assert_eq!(identity.role.as_deref(), Some("tutor"));
        assert_eq!(identity.email.as_deref(), Some("t@school.test"));
        assert_eq!(identity.subject, None);
    }

    #[test]
    fn test_extract_identity_short_form_wins() {
        let token = token_with_payload(&json!({
            "role": "admin",
            "https://hospitality-school.app/claims/role": "tutor",
        }));
        let identity = extract_identity(&token).unwrap();
        assert_eq!(identity.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_extract_identity_none_on_malformed() {
        assert_eq!(extract_identity("garbage"), None);
        assert_eq!(extract_identity("a.b.c.d"), None);
    }

    #[test]
    fn test_read_only_gating() {
        let tutor = token_with_payload(&json!({"role": "tutor"}));
        assert!(extract_identity(&tutor).unwrap().is_read_only());

        let manager = token_with_payload(&json!({"role": "manager"}));
        assert!(!extract_identity(&manager).unwrap().is_read_only());

        // Unknown roles are not gated client-side, the backend decides
        let unknown = token_with_payload(&json!({"role": "visitor"}));
        assert!(!extract_identity(&unknown).unwrap().is_read_only());

        let missing = token_with_payload(&json!({"sub": "u-1"}));
        assert!(!extract_identity(&missing).unwrap().is_read_only());
    }
}
