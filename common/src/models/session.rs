// common/src/models/session.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim names the issuer controls; custom claims may not use them
pub const REGISTERED_CLAIMS: &[&str] =
    &["iat", "exp", "nbf", "iss", "aud", "sub", "jti", "issuedAt", "expiresAt"];

/// Decoded contents of a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Base58 wallet public key the token was issued to
    pub public_key: String,
    /// Timestamp of the signed challenge, in milliseconds
    pub timestamp: i64,
    /// Issue time in milliseconds
    pub issued_at: i64,
    /// Expiry in milliseconds
    pub expires_at: i64,
    /// Issue time in seconds (standard JWT claim)
    pub iat: i64,
    /// Expiry in seconds (standard JWT claim)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(rename = "aud", default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Caller-supplied claims
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

impl SessionClaims {
    /// Whether the token has expired at `now_millis`
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        now_millis >= self.expires_at || now_millis >= self.exp.saturating_mul(1000)
    }

    /// Remaining lifetime in milliseconds, zero once expired
    pub fn remaining_millis(&self, now_millis: i64) -> i64 {
        (self.expires_at - now_millis).max(0)
    }

    pub fn custom_claim(&self, key: &str) -> Option<&Value> {
        self.custom.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> SessionClaims {
        SessionClaims {
            public_key: "5Zzg".to_string(),
            timestamp: 1_000,
            issued_at: 2_000,
            expires_at: 3_500,
            iat: 2,
            exp: 4,
            jti: None,
            issuer: Some("wallet-auth".to_string()),
            audience: None,
            subject: None,
            custom: Map::new(),
        }
    }

    #[test]
    fn test_expiry_boundaries() {
        let claims = sample();
        assert!(!claims.is_expired_at(3_499));
        assert!(claims.is_expired_at(3_500));
        assert_eq!(claims.remaining_millis(3_000), 500);
        assert_eq!(claims.remaining_millis(9_000), 0);
    }

    #[test]
    fn test_wire_names() {
        let mut claims = sample();
        claims.custom.insert("role".to_string(), json!("admin"));
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["publicKey"], "5Zzg");
        assert_eq!(value["expiresAt"], 3_500);
        assert_eq!(value["iss"], "wallet-auth");
        assert_eq!(value["role"], "admin");
        assert!(value.get("aud").is_none());

        let back: SessionClaims = serde_json::from_value(value).unwrap();
        assert_eq!(back.custom_claim("role"), Some(&json!("admin")));
        assert_eq!(back.issuer.as_deref(), Some("wallet-auth"));
    }
}
