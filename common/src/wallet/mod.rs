// Common Crate - wallet/mod.rs
// common/src/wallet/mod.rs
pub mod keypair;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AuthError;
use crate::logging::Logger;

pub use keypair::KeypairWallet;

/// Which wallet implementation sits behind an adapter. Metadata only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletProvider {
    Phantom,
    Solflare,
    Backpack,
    Glow,
    Other(String),
}

impl WalletProvider {
    pub fn name(&self) -> &str {
        match self {
            WalletProvider::Phantom => "Phantom",
            WalletProvider::Solflare => "Solflare",
            WalletProvider::Backpack => "Backpack",
            WalletProvider::Glow => "Glow",
            WalletProvider::Other(name) => name,
        }
    }
}

impl fmt::Display for WalletProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability every supported wallet exposes
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    fn provider(&self) -> WalletProvider;

    /// Base58 public key while connected
    fn public_key(&self) -> Option<String>;

    fn is_connected(&self) -> bool {
        self.public_key().is_some()
    }

    /// Connect and return the wallet's public key. May wait on the user.
    async fn connect(&mut self) -> Result<String, AuthError>;

    async fn disconnect(&mut self) -> Result<(), AuthError>;

    /// Sign raw message bytes, returning the 64-byte signature
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, AuthError>;
}

/// Wallets detected in the current environment
#[derive(Default)]
pub struct WalletRegistry {
    wallets: Vec<Box<dyn WalletAdapter>>,
    logger: Logger,
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn register(&mut self, wallet: Box<dyn WalletAdapter>) {
        let provider = wallet.provider();
        self.logger.in_scope(|| {
            tracing::debug!(provider = %provider, "Registered wallet adapter");
        });
        self.wallets.push(wallet);
    }

    pub fn with_wallet(mut self, wallet: Box<dyn WalletAdapter>) -> Self {
        self.register(wallet);
        self
    }

    pub fn providers(&self) -> Vec<WalletProvider> {
        self.wallets.iter().map(|w| w.provider()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Take the adapter for `preferred`, or the first one detected
    pub fn detect(
        &mut self,
        preferred: Option<&WalletProvider>,
    ) -> Result<Box<dyn WalletAdapter>, AuthError> {
        let index = match preferred {
            Some(provider) => self
                .wallets
                .iter()
                .position(|w| &w.provider() == provider)
                .ok_or_else(|| {
                    AuthError::wallet_not_found(format!("{} wallet is not installed", provider))
                })?,
            None if self.wallets.is_empty() => {
                return Err(AuthError::wallet_not_found("no supported wallet detected"));
            }
            None => 0,
        };
        Ok(self.wallets.remove(index))
    }
}
