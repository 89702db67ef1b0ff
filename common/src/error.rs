// Common Crate - error.rs
// common/src/error.rs
use std::fmt;
use thiserror::Error;

/// Boxed cause carried by [`AuthError`] variants
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Discriminant of an [`AuthError`], for callers that branch on the failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    WalletNotFound,
    WalletConnectionFailed,
    WalletNotConnected,
    SigningFailed,
    SignatureInvalid,
    TokenInvalid,
    ConfigurationInvalid,
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthErrorKind::WalletNotFound => "wallet_not_found",
            AuthErrorKind::WalletConnectionFailed => "wallet_connection_failed",
            AuthErrorKind::WalletNotConnected => "wallet_not_connected",
            AuthErrorKind::SigningFailed => "signing_failed",
            AuthErrorKind::SignatureInvalid => "signature_invalid",
            AuthErrorKind::TokenInvalid => "token_invalid",
            AuthErrorKind::ConfigurationInvalid => "configuration_invalid",
        };
        f.write_str(name)
    }
}

/// Errors raised by the wallet, issuance and validation paths.
///
/// Signature verification itself never produces one of these; it collapses
/// every failure to `false`. `SignatureInvalid` only appears when a caller
/// needed the signature to be valid (token issuance, client sign-in).
#[derive(Debug, Error)]
pub enum AuthError {
    /// No supported wallet was detected
    #[error("Wallet not found: {message}")]
    WalletNotFound {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The wallet rejected or failed the connection attempt
    #[error("Wallet connection failed: {message}")]
    WalletConnectionFailed {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// An operation needed a connected wallet
    #[error("Wallet not connected: {message}")]
    WalletNotConnected {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The wallet rejected or failed the signing request
    #[error("Signing failed: {message}")]
    SigningFailed {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Invalid signature: {message}")]
    SignatureInvalid {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Bad signature, expired, or claim mismatch
    #[error("Invalid token: {message}")]
    TokenInvalid {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Invalid configuration: {message}")]
    ConfigurationInvalid {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl AuthError {
    pub fn wallet_not_found(message: impl Into<String>) -> Self {
        AuthError::WalletNotFound { message: message.into(), source: None }
    }

    pub fn wallet_connection_failed(message: impl Into<String>) -> Self {
        AuthError::WalletConnectionFailed { message: message.into(), source: None }
    }

    pub fn wallet_not_connected(message: impl Into<String>) -> Self {
        AuthError::WalletNotConnected { message: message.into(), source: None }
    }

    pub fn signing_failed(message: impl Into<String>) -> Self {
        AuthError::SigningFailed { message: message.into(), source: None }
    }

    pub fn signature_invalid(message: impl Into<String>) -> Self {
        AuthError::SignatureInvalid { message: message.into(), source: None }
    }

    pub fn token_invalid(message: impl Into<String>) -> Self {
        AuthError::TokenInvalid { message: message.into(), source: None }
    }

    pub fn configuration_invalid(message: impl Into<String>) -> Self {
        AuthError::ConfigurationInvalid { message: message.into(), source: None }
    }

    /// Attach a wrapped cause, replacing any existing one
    pub fn with_source<E>(mut self, cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        let slot = match &mut self {
            AuthError::WalletNotFound { source, .. }
            | AuthError::WalletConnectionFailed { source, .. }
            | AuthError::WalletNotConnected { source, .. }
            | AuthError::SigningFailed { source, .. }
            | AuthError::SignatureInvalid { source, .. }
            | AuthError::TokenInvalid { source, .. }
            | AuthError::ConfigurationInvalid { source, .. } => source,
        };
        *slot = Some(cause.into());
        self
    }

    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::WalletNotFound { .. } => AuthErrorKind::WalletNotFound,
            AuthError::WalletConnectionFailed { .. } => AuthErrorKind::WalletConnectionFailed,
            AuthError::WalletNotConnected { .. } => AuthErrorKind::WalletNotConnected,
            AuthError::SigningFailed { .. } => AuthErrorKind::SigningFailed,
            AuthError::SignatureInvalid { .. } => AuthErrorKind::SignatureInvalid,
            AuthError::TokenInvalid { .. } => AuthErrorKind::TokenInvalid,
            AuthError::ConfigurationInvalid { .. } => AuthErrorKind::ConfigurationInvalid,
        }
    }

    /// Human-readable message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            AuthError::WalletNotFound { message, .. }
            | AuthError::WalletConnectionFailed { message, .. }
            | AuthError::WalletNotConnected { message, .. }
            | AuthError::SigningFailed { message, .. }
            | AuthError::SignatureInvalid { message, .. }
            | AuthError::TokenInvalid { message, .. }
            | AuthError::ConfigurationInvalid { message, .. } => message,
        }
    }
}
