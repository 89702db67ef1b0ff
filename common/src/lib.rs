pub mod challenge;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod messages;
pub mod models;
pub mod token;
pub mod verify;
pub mod wallet;

pub use challenge::{generate_message, AuthChallenge};
pub use client::WalletAuthClient;
pub use crate::config::Config;
pub use error::{AuthError, AuthErrorKind};
pub use logging::{setup_tracing, Logger};
pub use messages::*;
pub use models::auth::AuthResult;
pub use models::session::SessionClaims;
pub use token::{issue_token, validate_token, TokenIssuer, TokenOptions, TokenValidator};
pub use verify::{verify_signature, SignatureVerifier};
pub use wallet::{KeypairWallet, WalletAdapter, WalletProvider, WalletRegistry};
