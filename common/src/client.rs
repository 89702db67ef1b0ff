// Common Crate - client.rs
// common/src/client.rs
use crate::challenge::AuthChallenge;
use crate::error::{AuthError, AuthErrorKind};
use crate::logging::Logger;
use crate::models::auth::AuthResult;
use crate::verify::SignatureVerifier;
use crate::wallet::{WalletAdapter, WalletProvider, WalletRegistry};

/// Client side of the sign-in flow: connect a wallet and produce an [`AuthResult`]
pub struct WalletAuthClient {
    wallet: Box<dyn WalletAdapter>,
    verifier: SignatureVerifier,
    logger: Logger,
}

impl WalletAuthClient {
    pub fn new(wallet: Box<dyn WalletAdapter>) -> Self {
        Self::with_logger(wallet, Logger::default())
    }

    pub fn with_logger(wallet: Box<dyn WalletAdapter>, logger: Logger) -> Self {
        Self {
            wallet,
            verifier: SignatureVerifier::new(logger.clone()),
            logger,
        }
    }

    /// Build a client from the detected wallets
    pub fn detect(
        registry: &mut WalletRegistry,
        preferred: Option<&WalletProvider>,
    ) -> Result<Self, AuthError> {
        Ok(Self::new(registry.detect(preferred)?))
    }

    pub fn provider(&self) -> WalletProvider {
        self.wallet.provider()
    }

    pub fn is_connected(&self) -> bool {
        self.wallet.is_connected()
    }

    pub fn public_key(&self) -> Option<String> {
        self.wallet.public_key()
    }

    pub async fn connect(&mut self) -> Result<String, AuthError> {
        let provider = self.wallet.provider();
        match self.wallet.connect().await {
            Ok(public_key) => {
                self.logger.in_scope(|| {
                    tracing::info!(%provider, public_key = %public_key, "Wallet connected");
                });
                Ok(public_key)
            }
            Err(e) if e.kind() == AuthErrorKind::WalletConnectionFailed => Err(e),
            Err(e) => Err(AuthError::wallet_connection_failed(format!(
                "{} refused the connection",
                provider
            ))
            .with_source(e)),
        }
    }

    pub async fn disconnect(&mut self) -> Result<(), AuthError> {
        self.wallet.disconnect().await?;
        self.logger.in_scope(|| tracing::info!(provider = %self.wallet.provider(), "Wallet disconnected"));
        Ok(())
    }

    /// Sign a fresh challenge, or `custom_message` verbatim when given
    pub async fn sign_in(&self, custom_message: Option<String>) -> Result<AuthResult, AuthError> {
        let public_key = self
            .wallet
            .public_key()
            .ok_or_else(|| AuthError::wallet_not_connected("connect a wallet before signing in"))?;

        let challenge = match custom_message {
            Some(message) => {
                AuthChallenge::with_message(public_key, chrono::Utc::now().timestamp_millis(), message)
            }
            None => AuthChallenge::now(public_key),
        };

        let signature = match self.wallet.sign_message(challenge.message.as_bytes()).await {
            Ok(bytes) => bs58::encode(bytes).into_string(),
            Err(e) if e.kind() == AuthErrorKind::SigningFailed => return Err(e),
            Err(e) => {
                return Err(AuthError::signing_failed("wallet did not sign the challenge").with_source(e))
            }
        };

        // Local sanity check; the server verifies again before issuing anything
        if !self.verifier.verify(&signature, &challenge.message, &challenge.public_key) {
            return Err(AuthError::signature_invalid(
                "wallet returned a signature that does not verify",
            ));
        }

        self.logger.in_scope(|| {
            tracing::info!(public_key = %challenge.public_key, "Challenge signed");
        });

        Ok(AuthResult::from_challenge(challenge, signature))
    }
}
