//! NIST P-256 `did:key` plugin.
//!
//! Signatures are ECDSA over SHA-256 in the fixed-size `r || s` form that
//! WebCrypto produces.

use crate::{did::Did, error::ResolveError, plugin::KeyPlugin};
use async_trait::async_trait;
use p256::ecdsa::{Signature, VerifyingKey, signature::Verifier as _};

/// Multicodec prefix for P-256 public keys: `[0x80, 0x24]` is the varint
/// encoding of `0x1200` (p256-pub).
pub const P256_PREFIX: [u8; 2] = [0x80, 0x24];

/// JWT algorithm name for P-256 signatures.
pub const P256_ALG: &str = "ES256";

/// Verifies ES256 signatures for `did:key:zDn...` identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct P256Plugin;

impl P256Plugin {
    /// Parse a SEC1 encoded (compressed or uncompressed) public key.
    ///
    /// # Errors
    ///
    /// Fails with [`ResolveError::InvalidKey`] if the bytes are not a point
    /// on the curve.
    pub fn verifying_key(did: &Did, public_key: &[u8]) -> Result<VerifyingKey, ResolveError> {
        VerifyingKey::from_sec1_bytes(public_key).map_err(|_| ResolveError::InvalidKey {
            did: did.to_string(),
            algorithm: P256_ALG.to_string(),
        })
    }
}

#[async_trait]
impl KeyPlugin for P256Plugin {
    fn prefix(&self) -> &[u8] {
        &P256_PREFIX
    }

    fn jwt_alg(&self) -> &str {
        P256_ALG
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

/// The `did:key` of a P-256 verifying key, using the compressed point.
#[must_use]
pub fn did_from_verifying_key(key: &VerifyingKey) -> Did {
    Did::from_key_bytes(&P256_PREFIX, key.to_encoded_point(true).as_bytes())
}
