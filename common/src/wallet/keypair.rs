// common/src/wallet/keypair.rs
use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;

use super::{WalletAdapter, WalletProvider};
use crate::error::AuthError;

/// In-process wallet backed by an Ed25519 signing key
pub struct KeypairWallet {
    provider: WalletProvider,
    signing_key: SigningKey,
    connected: bool,
}

impl KeypairWallet {
    /// Generate a new random keypair
    pub fn generate(provider: WalletProvider) -> Self {
        Self::from_signing_key(provider, SigningKey::generate(&mut OsRng))
    }

    /// Create wallet from existing secret key bytes (32 bytes)
    pub fn from_secret_key(provider: WalletProvider, bytes: &[u8; 32]) -> Self {
        Self::from_signing_key(provider, SigningKey::from_bytes(bytes))
    }

    fn from_signing_key(provider: WalletProvider, signing_key: SigningKey) -> Self {
        Self {
            provider,
            signing_key,
            connected: false,
        }
    }

    /// Base58 public key, regardless of connection state
    pub fn public_key_base58(&self) -> String {
        bs58::encode(self.signing_key.verifying_key().as_bytes()).into_string()
    }
}

#[async_trait]
impl WalletAdapter for KeypairWallet {
    fn provider(&self) -> WalletProvider {
        self.provider.clone()
    }

    fn public_key(&self) -> Option<String> {
        self.connected.then(|| self.public_key_base58())
    }

    async fn connect(&mut self) -> Result<String, AuthError> {
        self.connected = true;
        Ok(self.public_key_base58())
    }

    async fn disconnect(&mut self) -> Result<(), AuthError> {
        self.connected = false;
        Ok(())
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, AuthError> {
        if !self.connected {
            return Err(AuthError::wallet_not_connected("connect the wallet before signing"));
        }
        Ok(self.signing_key.sign(message).to_bytes().to_vec())
    }
}
