// Common Crate - messages.rs
// common/src/messages.rs
use serde::{Deserialize, Serialize};

use crate::models::auth::AuthResult;
use crate::models::session::SessionClaims;

/// Body of `POST /api/auth`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub public_key: String,
    pub signature: String,
    pub message: String,
    pub timestamp: i64,
}

impl From<AuthRequest> for AuthResult {
    fn from(req: AuthRequest) -> Self {
        AuthResult {
            public_key: req.public_key,
            signature: req.signature,
            message: req.message,
            timestamp: req.timestamp,
            token: None,
        }
    }
}

impl From<&AuthResult> for AuthRequest {
    fn from(result: &AuthResult) -> Self {
        AuthRequest {
            public_key: result.public_key.clone(),
            signature: result.signature.clone(),
            message: result.message.clone(),
            timestamp: result.timestamp,
        }
    }
}

/// Response to an authentication attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthResponse {
    pub fn token(token: String) -> Self {
        Self { success: true, token: Some(token), error: None }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self { success: false, token: None, error: Some(error.into()) }
    }
}

/// Query of `GET /api/auth/challenge`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeQuery {
    pub public_key: String,
}

/// Response of `GET /api/session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub claims: SessionClaims,
}
