// Common Crate - verify.rs
// common/src/verify.rs
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::logging::Logger;

const PUBLIC_KEY_LENGTH: usize = 32;
const SIGNATURE_LENGTH: usize = 64;

/// Verify a base58 Ed25519 signature over the UTF-8 bytes of `message`.
///
/// Any decoding problem (bad base58, wrong length, key off the curve) is a
/// `false`, never a panic or an error.
pub fn verify_signature(signature: &str, message: &str, public_key: &str) -> bool {
    check_signature(signature, message, public_key).is_ok()
}

/// Why a signature was rejected. Only surfaced to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    MalformedPublicKey,
    MalformedSignature,
    Mismatch,
}

fn check_signature(signature: &str, message: &str, public_key: &str) -> Result<(), Rejection> {
    let key_bytes: [u8; PUBLIC_KEY_LENGTH] = bs58::decode(public_key)
        .into_vec()
        .ok()
        .and_then(|bytes| <[u8; PUBLIC_KEY_LENGTH]>::try_from(bytes).ok())
        .ok_or(Rejection::MalformedPublicKey)?;

    let verifying_key =
        VerifyingKey::from_bytes(&key_bytes).map_err(|_| Rejection::MalformedPublicKey)?;

    let sig_bytes: [u8; SIGNATURE_LENGTH] = bs58::decode(signature)
        .into_vec()
        .ok()
        .and_then(|bytes| <[u8; SIGNATURE_LENGTH]>::try_from(bytes).ok())
        .ok_or(Rejection::MalformedSignature)?;

    let sig = Signature::from_bytes(&sig_bytes);

    verifying_key
        .verify(message.as_bytes(), &sig)
        .map_err(|_| Rejection::Mismatch)
}

/// Signature verification with an injected logger
#[derive(Debug, Clone, Default)]
pub struct SignatureVerifier {
    logger: Logger,
}

impl SignatureVerifier {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn verify(&self, signature: &str, message: &str, public_key: &str) -> bool {
        self.logger.in_scope(|| match check_signature(signature, message, public_key) {
            Ok(()) => {
                tracing::debug!(public_key = %public_key, "Signature verified");
                true
            }
            Err(reason) => {
                tracing::debug!(public_key = %public_key, ?reason, "Signature rejected");
                false
            }
        })
    }
}
