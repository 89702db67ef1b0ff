// Common Crate - token.rs
// common/src/token.rs
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::AuthError;
use crate::logging::Logger;
use crate::models::auth::AuthResult;
use crate::models::session::{SessionClaims, REGISTERED_CLAIMS};
use crate::verify::SignatureVerifier;

/// Token lifetime when none is configured (24 hours)
pub const DEFAULT_EXPIRES_IN: Duration = Duration::from_secs(24 * 60 * 60);

const ALGORITHM: Algorithm = Algorithm::HS256;

fn default_expires_in() -> Duration {
    DEFAULT_EXPIRES_IN
}

/// Options for minting a token, and the expected values when validating one
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenOptions {
    #[serde(with = "humantime_serde", default = "default_expires_in")]
    pub expires_in: Duration,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub custom_claims: Map<String, Value>,
}

impl Default for TokenOptions {
    fn default() -> Self {
        Self {
            expires_in: DEFAULT_EXPIRES_IN,
            issuer: None,
            audience: None,
            subject: None,
            custom_claims: Map::new(),
        }
    }
}

impl TokenOptions {
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// Set the lifetime from a human-readable duration such as `"24h"` or `"1s"`
    pub fn with_expires_in_str(self, expires_in: &str) -> Result<Self, AuthError> {
        let parsed = humantime::parse_duration(expires_in).map_err(|e| {
            AuthError::configuration_invalid(format!("invalid expiresIn {:?}", expires_in))
                .with_source(e)
        })?;
        Ok(self.with_expires_in(parsed))
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_claim(mut self, key: impl Into<String>, value: Value) -> Self {
        self.custom_claims.insert(key.into(), value);
        self
    }

    /// Reject contradictory or empty settings
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.expires_in.is_zero() {
            return Err(AuthError::configuration_invalid("expiresIn must be greater than zero"));
        }

        // Millisecond arithmetic must stay within i64
        if i64::try_from(self.expires_in.as_millis()).is_err() {
            return Err(AuthError::configuration_invalid("expiresIn is too large"));
        }

        for (name, value) in [
            ("issuer", &self.issuer),
            ("audience", &self.audience),
            ("subject", &self.subject),
        ] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(AuthError::configuration_invalid(format!(
                    "{} must not be empty when set",
                    name
                )));
            }
        }

        if let Some(key) = self
            .custom_claims
            .keys()
            .find(|key| REGISTERED_CLAIMS.contains(&key.as_str()))
        {
            return Err(AuthError::configuration_invalid(format!(
                "custom claim {:?} collides with a registered claim",
                key
            )));
        }

        // Overrides must still decode as session claims on validation
        if matches!(self.custom_claims.get("publicKey"), Some(v) if !v.is_string()) {
            return Err(AuthError::configuration_invalid(
                "custom claim \"publicKey\" must be a string",
            ));
        }
        if matches!(self.custom_claims.get("timestamp"), Some(v) if v.as_i64().is_none()) {
            return Err(AuthError::configuration_invalid(
                "custom claim \"timestamp\" must be an integer",
            ));
        }

        Ok(())
    }
}

fn check_secret(secret: &[u8]) -> Result<(), AuthError> {
    if secret.is_empty() {
        return Err(AuthError::configuration_invalid("token secret must not be empty"));
    }
    Ok(())
}

/// Mints session tokens, gated on a fresh signature verification
#[derive(Debug, Clone, Default)]
pub struct TokenIssuer {
    verifier: SignatureVerifier,
    logger: Logger,
}

impl TokenIssuer {
    pub fn new(logger: Logger) -> Self {
        Self {
            verifier: SignatureVerifier::new(logger.clone()),
            logger,
        }
    }

    /// Verify `auth`'s signature and, only if it holds, sign a token for it
    pub fn issue(
        &self,
        auth: &AuthResult,
        secret: &[u8],
        options: &TokenOptions,
    ) -> Result<String, AuthError> {
        self.issue_at(auth, secret, options, Utc::now().timestamp_millis())
    }

    pub fn issue_at(
        &self,
        auth: &AuthResult,
        secret: &[u8],
        options: &TokenOptions,
        now_millis: i64,
    ) -> Result<String, AuthError> {
        if !self.verifier.verify(&auth.signature, &auth.message, &auth.public_key) {
            self.logger.in_scope(|| {
                tracing::warn!(public_key = %auth.public_key, "Refusing to issue token: signature invalid");
            });
            return Err(AuthError::signature_invalid(
                "signature does not match message and public key",
            ));
        }

        check_secret(secret)?;
        options.validate()?;

        let claims = build_claims(auth, options, now_millis)?;
        let token = encode(&Header::new(ALGORITHM), &claims, &EncodingKey::from_secret(secret))
            .map_err(|e| AuthError::configuration_invalid("failed to sign token").with_source(e))?;

        self.logger.in_scope(|| {
            tracing::info!(
                public_key = %auth.public_key,
                expires_in_secs = options.expires_in.as_secs(),
                "Issued session token"
            );
        });

        Ok(token)
    }
}

fn build_claims(
    auth: &AuthResult,
    options: &TokenOptions,
    now_millis: i64,
) -> Result<Map<String, Value>, AuthError> {
    // validate() has already bounded expires_in to i64 millis
    let lifetime = i64::try_from(options.expires_in.as_millis()).unwrap_or(i64::MAX);
    let expires_at = now_millis.saturating_add(lifetime);

    let session = SessionClaims {
        public_key: auth.public_key.clone(),
        timestamp: auth.timestamp,
        issued_at: now_millis,
        expires_at,
        iat: now_millis.div_euclid(1000),
        // Round up so the seconds claim never expires before the millisecond one
        exp: expires_at.div_euclid(1000) + i64::from(expires_at.rem_euclid(1000) != 0),
        jti: Some(Uuid::new_v4().to_string()),
        issuer: options.issuer.clone(),
        audience: options.audience.clone(),
        subject: options.subject.clone(),
        custom: Map::new(),
    };

    let mut claims = match serde_json::to_value(&session) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(AuthError::configuration_invalid("claims did not serialize to an object")),
        Err(e) => {
            return Err(AuthError::configuration_invalid("failed to serialize claims").with_source(e))
        }
    };

    // Caller-supplied claims win on publicKey/timestamp collisions
    for (key, value) in &options.custom_claims {
        claims.insert(key.clone(), value.clone());
    }

    Ok(claims)
}

/// Checks session tokens presented by clients
#[derive(Debug, Clone, Default)]
pub struct TokenValidator {
    logger: Logger,
}

impl TokenValidator {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Verify the signature, expiry and any expected issuer/audience
    pub fn validate(
        &self,
        token: &str,
        secret: &[u8],
        expected: Option<&TokenOptions>,
    ) -> Result<SessionClaims, AuthError> {
        self.validate_at(token, secret, expected, Utc::now().timestamp_millis())
    }

    pub fn validate_at(
        &self,
        token: &str,
        secret: &[u8],
        expected: Option<&TokenOptions>,
        now_millis: i64,
    ) -> Result<SessionClaims, AuthError> {
        check_secret(secret)?;

        let result = check_token(token, secret, expected, now_millis);
        self.logger.in_scope(|| match &result {
            Ok(claims) => {
                tracing::debug!(public_key = %claims.public_key, "Token validated");
            }
            Err(e) => {
                tracing::debug!(error = %e, "Token rejected");
            }
        });
        result
    }
}

fn check_token(
    token: &str,
    secret: &[u8],
    expected: Option<&TokenOptions>,
    now_millis: i64,
) -> Result<SessionClaims, AuthError> {
    let mut validation = Validation::new(ALGORITHM);
    // Expiry is checked below at millisecond precision with no leeway
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let claims = decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| AuthError::token_invalid("token could not be verified").with_source(e))?
        .claims;

    if claims.is_expired_at(now_millis) {
        return Err(AuthError::token_invalid("token has expired"));
    }

    if let Some(expected) = expected {
        if let Some(issuer) = &expected.issuer {
            if claims.issuer.as_ref() != Some(issuer) {
                return Err(AuthError::token_invalid("issuer mismatch"));
            }
        }
        if let Some(audience) = &expected.audience {
            if claims.audience.as_ref() != Some(audience) {
                return Err(AuthError::token_invalid("audience mismatch"));
            }
        }
    }

    Ok(claims)
}

/// Issue a token with a no-op logger
pub fn issue_token(
    auth: &AuthResult,
    secret: &[u8],
    options: &TokenOptions,
) -> Result<String, AuthError> {
    TokenIssuer::default().issue(auth, secret, options)
}

/// Validate a token with a no-op logger
pub fn validate_token(
    token: &str,
    secret: &[u8],
    expected: Option<&TokenOptions>,
) -> Result<SessionClaims, AuthError> {
    TokenValidator::default().validate(token, secret, expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::generate_message;
    use crate::error::AuthErrorKind;
    use ed25519_dalek::{Signer, SigningKey};
    use rand::rngs::OsRng;
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret-with-enough-length-000";

    fn signed_result(message: Option<&str>) -> AuthResult {
        let signing_key = SigningKey::generate(&mut OsRng);
        let public_key = bs58::encode(signing_key.verifying_key().as_bytes()).into_string();
        let timestamp = 1_700_000_000_000;
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| generate_message(&public_key, timestamp));
        let signature = bs58::encode(signing_key.sign(message.as_bytes()).to_bytes()).into_string();
        AuthResult {
            public_key,
            signature,
            message,
            timestamp,
            token: None,
        }
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let auth = signed_result(None);
        let options = TokenOptions::default();
        let token = issue_token(&auth, SECRET, &options).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = validate_token(&token, SECRET, Some(&options)).unwrap();
        assert_eq!(claims.public_key, auth.public_key);
        assert_eq!(claims.timestamp, auth.timestamp);
        assert_eq!(claims.expires_at - claims.issued_at, 24 * 60 * 60 * 1000);
        assert!(claims.jti.is_some());
        assert!(claims.issuer.is_none());
    }

    #[test]
    fn test_invalid_signature_issues_nothing() {
        let mut auth = signed_result(None);
        auth.message.push('!');
        let err = issue_token(&auth, SECRET, &TokenOptions::default()).unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::SignatureInvalid);

        let mut garbage = signed_result(None);
        garbage.signature = "not-base58".to_string();
        let err = issue_token(&garbage, SECRET, &TokenOptions::default()).unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::SignatureInvalid);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let auth = signed_result(None);
        let token = issue_token(&auth, b"secret-b", &TokenOptions::default()).unwrap();
        let err = validate_token(&token, b"secret-a", None).unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::TokenInvalid);
    }

    #[test]
    fn test_expiry_at_millisecond_precision() {
        let auth = signed_result(None);
        let options = TokenOptions::default().with_expires_in(Duration::from_millis(1_500));
        let issuer = TokenIssuer::default();
        let validator = TokenValidator::default();

        let now = Utc::now().timestamp_millis();
        let token = issuer.issue_at(&auth, SECRET, &options, now).unwrap();

        assert!(validator.validate_at(&token, SECRET, None, now).is_ok());
        assert!(validator.validate_at(&token, SECRET, None, now + 1_499).is_ok());
        let err = validator.validate_at(&token, SECRET, None, now + 1_500).unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::TokenInvalid);
        assert_eq!(err.message(), "token has expired");
    }

    #[test]
    fn test_one_second_token_expires_in_real_time() {
        let auth = signed_result(Some("hello"));
        let options = TokenOptions::default().with_expires_in_str("1s").unwrap();
        let token = issue_token(&auth, SECRET, &options).unwrap();

        assert!(validate_token(&token, SECRET, Some(&options)).is_ok());
        std::thread::sleep(Duration::from_millis(1_500));
        let err = validate_token(&token, SECRET, Some(&options)).unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::TokenInvalid);
    }

    #[test]
    fn test_audience_mismatch() {
        let auth = signed_result(None);
        let issued_with = TokenOptions::default().with_audience("app-a");
        let token = issue_token(&auth, SECRET, &issued_with).unwrap();

        let expected = TokenOptions::default().with_audience("app-b");
        let err = validate_token(&token, SECRET, Some(&expected)).unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::TokenInvalid);

        let claims = validate_token(&token, SECRET, Some(&issued_with)).unwrap();
        assert_eq!(claims.audience.as_deref(), Some("app-a"));
        // No expectation means the audience is not checked
        assert!(validate_token(&token, SECRET, None).is_ok());
    }

    #[test]
    fn test_issuer_required_when_expected() {
        let auth = signed_result(None);
        let token = issue_token(&auth, SECRET, &TokenOptions::default()).unwrap();
        let expected = TokenOptions::default().with_issuer("wallet-auth");
        let err = validate_token(&token, SECRET, Some(&expected)).unwrap_err();
        assert_eq!(err.message(), "issuer mismatch");

        let issued = TokenOptions::default()
            .with_issuer("wallet-auth")
            .with_subject("session");
        let token = issue_token(&auth, SECRET, &issued).unwrap();
        let claims = validate_token(&token, SECRET, Some(&expected)).unwrap();
        assert_eq!(claims.issuer.as_deref(), Some("wallet-auth"));
        assert_eq!(claims.subject.as_deref(), Some("session"));
    }

    #[test]
    fn test_custom_claims_merge_and_override() {
        let auth = signed_result(None);
        let options = TokenOptions::default()
            .with_claim("role", json!("admin"))
            .with_claim("publicKey", json!("overridden"));
        let token = issue_token(&auth, SECRET, &options).unwrap();

        let claims = validate_token(&token, SECRET, None).unwrap();
        assert_eq!(claims.custom_claim("role"), Some(&json!("admin")));
        assert_eq!(claims.public_key, "overridden");
    }

    #[test]
    fn test_mistyped_claim_override_rejected() {
        let auth = signed_result(None);
        for options in [
            TokenOptions::default().with_claim("timestamp", json!("soon")),
            TokenOptions::default().with_claim("timestamp", json!(1.5)),
            TokenOptions::default().with_claim("publicKey", json!(42)),
            TokenOptions::default().with_claim("publicKey", Value::Null),
        ] {
            let err = issue_token(&auth, SECRET, &options).unwrap_err();
            assert_eq!(err.kind(), AuthErrorKind::ConfigurationInvalid);
        }

        let options = TokenOptions::default().with_claim("timestamp", json!(42));
        let token = issue_token(&auth, SECRET, &options).unwrap();
        assert_eq!(validate_token(&token, SECRET, None).unwrap().timestamp, 42);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let auth = signed_result(None);

        let zero = TokenOptions::default().with_expires_in(Duration::ZERO);
        assert_eq!(
            issue_token(&auth, SECRET, &zero).unwrap_err().kind(),
            AuthErrorKind::ConfigurationInvalid
        );

        let registered = TokenOptions::default().with_claim("exp", json!(1));
        assert_eq!(
            issue_token(&auth, SECRET, &registered).unwrap_err().kind(),
            AuthErrorKind::ConfigurationInvalid
        );

        let empty_issuer = TokenOptions::default().with_issuer("  ");
        assert!(empty_issuer.validate().is_err());

        assert_eq!(
            issue_token(&auth, b"", &TokenOptions::default()).unwrap_err().kind(),
            AuthErrorKind::ConfigurationInvalid
        );

        let err = TokenOptions::default().with_expires_in_str("soon").unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::ConfigurationInvalid);
    }

    #[test]
    fn test_malformed_token_rejected() {
        for token in ["", "abc", "a.b.c", "not.a.jwt.at.all"] {
            let err = validate_token(token, SECRET, None).unwrap_err();
            assert_eq!(err.kind(), AuthErrorKind::TokenInvalid);
        }
    }

    #[test]
    fn test_options_deserialize_humantime() {
        let options: TokenOptions = serde_json::from_value(json!({
            "expires_in": "30m",
            "issuer": "wallet-auth"
        }))
        .unwrap();
        assert_eq!(options.expires_in, Duration::from_secs(1800));
        assert_eq!(options.issuer.as_deref(), Some("wallet-auth"));

        let defaults: TokenOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(defaults.expires_in, DEFAULT_EXPIRES_IN);
    }
}
