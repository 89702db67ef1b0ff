// Common Crate - challenge.rs
// common/src/challenge.rs
use serde::{Deserialize, Serialize};

/// Label that precedes the timestamp in every generated challenge
pub const TIMESTAMP_LABEL: &str = "Timestamp:";

/// Build the message a wallet signs to prove control of `public_key`.
///
/// The text is stable for a given `(public_key, timestamp)` pair and
/// changes whenever either input changes.
pub fn generate_message(public_key: &str, timestamp: i64) -> String {
    format!(
        "Sign this message to authenticate with your wallet.\n\
         \n\
         Wallet: {}\n\
         {} {}\n\
         \n\
         This request will not trigger a blockchain transaction or cost any fees.",
        public_key, TIMESTAMP_LABEL, timestamp
    )
}

/// A challenge for a single sign-in attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthChallenge {
    pub public_key: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub message: String,
}

impl AuthChallenge {
    pub fn new(public_key: impl Into<String>, timestamp: i64) -> Self {
        let public_key = public_key.into();
        let message = generate_message(&public_key, timestamp);
        Self { public_key, timestamp, message }
    }

    /// Use a caller-supplied message verbatim instead of the generated one
    pub fn with_message(
        public_key: impl Into<String>,
        timestamp: i64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            public_key: public_key.into(),
            timestamp,
            message: message.into(),
        }
    }

    /// Challenge for `public_key` stamped with the current time
    pub fn now(public_key: impl Into<String>) -> Self {
        Self::new(public_key, chrono::Utc::now().timestamp_millis())
    }
}
