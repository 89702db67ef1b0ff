// common/src/models/auth.rs
use serde::{Deserialize, Serialize};

use crate::challenge::AuthChallenge;

/// Outcome of a wallet signature, sent once to the server in exchange for a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    /// Base58 wallet public key
    pub public_key: String,
    /// Base58 Ed25519 signature over `message`
    pub signature: String,
    /// Exactly the text that was signed
    pub message: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthResult {
    /// Pair a signed challenge with its signature
    pub fn from_challenge(challenge: AuthChallenge, signature: String) -> Self {
        Self {
            public_key: challenge.public_key,
            signature,
            message: challenge.message,
            timestamp: challenge.timestamp,
            token: None,
        }
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }
}
