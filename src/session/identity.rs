//! Claims decoded from the access token

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

/// Identity carried by an access token.
///
/// Derived from the token on demand and never stored. The signature is not
/// checked; the backend is the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedIdentity {
    /// Subject (simplejwt `user_id`; integer or string depending on the backend)
    #[serde(rename = "user_id", deserialize_with = "id_as_string")]
    pub subject: String,

    /// Expiry as a Unix timestamp
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Str(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Str(s) => s,
    })
}

impl DecodedIdentity {
    /// Decode the payload segment of a JWT.
    pub fn from_token(token: &str) -> Result<Self, ApiError> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => {
                return Err(ApiError::InvalidResponse(
                    "Access token is not a JWT".to_string(),
                ));
            }
        };

        // Some encoders keep the padding
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to decode JWT payload: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse JWT payload: {}", e)))
    }

    /// Expiry as a timestamp, if representable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an unsigned JWT carrying the given claims.
    fn make_token(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn test_decodes_simplejwt_claims() {
        let token = make_token(serde_json::json!({
            "token_type": "access",
            "exp": 4_102_444_800i64,
            "jti": "abc123",
            "user_id": 42,
            "username": "sponsor1",
            "email": "sponsor1@example.com"
        }));

        let identity = DecodedIdentity::from_token(&token).unwrap();
        assert_eq!(identity.subject, "42");
        assert_eq!(identity.username.as_deref(), Some("sponsor1"));
        assert_eq!(identity.email.as_deref(), Some("sponsor1@example.com"));
        assert_eq!(identity.token_type.as_deref(), Some("access"));
        assert!(!identity.is_expired());
        assert_eq!(identity.expires_at().unwrap().timestamp(), 4_102_444_800);
    }

    #[test]
    fn test_string_subject() {
        let token = make_token(serde_json::json!({
            "exp": 1,
            "user_id": "6f1c2b7e-0000-4000-8000-000000000000"
        }));

        let identity = DecodedIdentity::from_token(&token).unwrap();
        assert_eq!(identity.subject, "6f1c2b7e-0000-4000-8000-000000000000");
        assert!(identity.is_expired());
    }

    #[test]
    fn test_expiry_boundary() {
        let token = make_token(serde_json::json!({ "exp": 1_000, "user_id": 1 }));
        let identity = DecodedIdentity::from_token(&token).unwrap();

        let before = DateTime::from_timestamp(999, 0).unwrap();
        let at = DateTime::from_timestamp(1_000, 0).unwrap();
        assert!(!identity.is_expired_at(before));
        assert!(identity.is_expired_at(at));
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert!(DecodedIdentity::from_token("not-a-jwt").is_err());
        assert!(DecodedIdentity::from_token("a.b.c.d").is_err());
        assert!(DecodedIdentity::from_token("a.!!!.c").is_err());

        let no_exp = make_token(serde_json::json!({ "user_id": 1 }));
        assert!(DecodedIdentity::from_token(&no_exp).is_err());
    }
}
