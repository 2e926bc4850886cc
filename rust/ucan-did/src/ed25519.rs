//! Ed25519 `did:key` plugin.

use crate::{did::Did, error::ResolveError, plugin::KeyPlugin};
use async_trait::async_trait;
use ed25519_dalek::{Signature, VerifyingKey};
use signature::Verifier as _;

/// Multicodec prefix for Ed25519 public keys (`ed25519-pub`, `0xed`).
pub const ED25519_PREFIX: [u8; 2] = [0xed, 0x01];

/// JWT algorithm name for Ed25519 signatures.
pub const ED25519_ALG: &str = "EdDSA";

/// Verifies Ed25519 signatures for `did:key:z6Mk...` identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Plugin;

impl Ed25519Plugin {
    /// Parse the raw 32-byte public key embedded in a `did:key`.
    ///
    /// # Errors
    ///
    /// Fails with [`ResolveError::InvalidKey`] if the bytes are not a valid
    /// Ed25519 point.
    pub fn verifying_key(did: &Did, public_key: &[u8]) -> Result<VerifyingKey, ResolveError> {
        let invalid = || ResolveError::InvalidKey {
            did: did.to_string(),
            algorithm: ED25519_ALG.to_string(),
        };
        let bytes: [u8; 32] = public_key.try_into().map_err(|_| invalid())?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| invalid())
    }
}

#[async_trait]
impl KeyPlugin for Ed25519Plugin {
    fn prefix(&self) -> &[u8] {
        &ED25519_PREFIX
    }

    fn jwt_alg(&self) -> &str {
        ED25519_ALG
    }

    async fn verify(
        &self,
        did: &Did,
        public_key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, ResolveError> {
        let key = Self::verifying_key(did, public_key)?;
        let Ok(signature) = Signature::from_slice(signature) else {
            return Ok(false);
        };
        Ok(key.verify(message, &signature).is_ok())
    }
}

/// The `did:key` of an Ed25519 verifying key.
#[must_use]
pub fn did_from_verifying_key(key: &VerifyingKey) -> Did {
    Did::from_key_bytes(&ED25519_PREFIX, key.as_bytes())
}
