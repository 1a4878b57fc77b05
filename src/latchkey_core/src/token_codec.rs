//! Magic-link token generation and hashing.
//!
//! The plaintext is delivered to the user, the digest is what gets stored.
//! A leaked `verification_tokens` table therefore yields nothing redeemable.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{TryRngCore, rngs::OsRng};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::domain::verification_token::{PlaintextToken, TokenDigest};

/// Bytes of entropy per token (256 bits).
pub const TOKEN_ENTROPY_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum TokenCodecError {
    #[error("Entropy source failed: {0}")]
    EntropyUnavailable(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCodec;

impl TokenCodec {
    /// Produces a fresh plaintext token together with its digest.
    pub fn generate() -> Result<(PlaintextToken, TokenDigest), TokenCodecError> {
        let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenCodecError::EntropyUnavailable(e.to_string()))?;

        let plaintext = PlaintextToken::from_encoded(URL_SAFE_NO_PAD.encode(bytes));
        let digest = Self::digest(&plaintext);

        Ok((plaintext, digest))
    }

    /// Re-derives the stored digest from a plaintext token.
    pub fn digest(plaintext: &PlaintextToken) -> TokenDigest {
        let hash = Sha256::digest(plaintext.as_ref().expose_secret().as_bytes());
        let mut bytes = [0u8; TokenDigest::LENGTH];
        bytes.copy_from_slice(&hash);
        TokenDigest::from_bytes(bytes)
    }
}
