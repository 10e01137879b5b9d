//! Ed25519 signature engine.
//!
//! The private key is the base64 text of a 32-byte seed. The canonical string
//! is hashed with SHA-256 and the digest is signed; the signature is returned
//! base64 encoded.

use crate::domain::ports::SignatureEngine;
use crate::error::{OrderError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Signer;

impl Ed25519Signer {
    /// Decodes base64 key material into a signing key.
    pub fn signing_key(private_key: &[u8]) -> Result<SigningKey> {
        let text = std::str::from_utf8(private_key)
            .map_err(|_| OrderError::Signing("private key is not UTF-8 text".into()))?;
        let bytes = BASE64
            .decode(text.trim())
            .map_err(|e| OrderError::Signing(format!("invalid private key base64: {e}")))?;
        let seed: [u8; 32] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            OrderError::Signing(format!(
                "invalid private key length: expected 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(SigningKey::from_bytes(&seed))
    }

    /// Public half of `private_key`, for handing to the gateway operator.
    pub fn verifying_key(private_key: &[u8]) -> Result<VerifyingKey> {
        Ok(Self::signing_key(private_key)?.verifying_key())
    }
}

impl SignatureEngine for Ed25519Signer {
    fn sign(&self, private_key: &[u8], canonical: &str) -> Result<String> {
        let signing_key = Self::signing_key(private_key)?;
        let digest = Sha256::digest(canonical.as_bytes());
        let signature = signing_key.sign(&digest);
        Ok(BASE64.encode(signature.to_bytes()))
    }
}
