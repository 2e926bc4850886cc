//! RSA `did:key` plugins.
//!
//! Signatures are RSASSA-PKCS1-v1_5 over SHA-256 (JWT `RS256`). Two key
//! encodings are in use: the multicodec `rsa-pub` form carrying a PKCS#1
//! `RSAPublicKey`, and an older form carrying a SubjectPublicKeyInfo
//! document. Both are accepted.

use crate::{did::Did, error::ResolveError, plugin::KeyPlugin};
use async_trait::async_trait;
use rsa::{
    RsaPublicKey,
    pkcs1::DecodeRsaPublicKey,
    pkcs1v15::{Signature, VerifyingKey},
    pkcs8::DecodePublicKey,
};
use sha2::Sha256;
use signature::Verifier as _;

/// Multicodec prefix for RSA public keys: varint of `0x1205` (rsa-pub).
pub const RS256_PREFIX: [u8; 2] = [0x85, 0x24];

/// Prefix of RSA keys in the older `did:key` encoding.
pub const LEGACY_RS256_PREFIX: [u8; 3] = [0x00, 0xf5, 0x02];

/// JWT algorithm name for RSA signatures.
pub const RS256_ALG: &str = "RS256";

/// Verifies RS256 signatures for `did:key:z4MX...` identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rs256Plugin;

impl Rs256Plugin {
    /// Parse a DER encoded PKCS#1 `RSAPublicKey`.
    ///
    /// # Errors
    ///
    /// Fails with [`ResolveError::InvalidKey`] if the bytes are not an RSA
    /// public key.
    pub fn public_key(did: &Did, public_key: &[u8]) -> Result<RsaPublicKey, ResolveError> {
        RsaPublicKey::from_pkcs1_der(public_key).map_err(|_| invalid_key(did))
    }
}

#[async_trait]
impl KeyPlugin for Rs256Plugin {
    fn prefix(&self) -> &[u8] {
        &RS256_PREFIX
    }

    fn jwt_alg(&self) -> &str {
        RS256_ALG
    }

    async fn verify(
        &self,
        did: &Did,
        public_key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, ResolveError> {
        let key = Self::public_key(did, public_key)?;
        Ok(verify_pkcs1v15(key, message, signature))
    }
}

/// Verifies RS256 signatures for RSA keys in the older `did:key:z13V...`
/// encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyRs256Plugin;

impl LegacyRs256Plugin {
    /// Parse a DER encoded SubjectPublicKeyInfo holding an RSA key.
    ///
    /// # Errors
    ///
    /// Fails with [`ResolveError::InvalidKey`] if the bytes are not an RSA
    /// public key.
    pub fn public_key(did: &Did, public_key: &[u8]) -> Result<RsaPublicKey, ResolveError> {
        RsaPublicKey::from_public_key_der(public_key).map_err(|_| invalid_key(did))
    }
}

#[async_trait]
impl KeyPlugin for LegacyRs256Plugin {
    fn prefix(&self) -> &[u8] {
        &LEGACY_RS256_PREFIX
    }

    fn jwt_alg(&self) -> &str {
        RS256_ALG
    }

    async fn verify(
        &self,
        did: &Did,
        public_key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, ResolveError> {
        let key = Self::public_key(did, public_key)?;
        Ok(verify_pkcs1v15(key, message, signature))
    }
}

fn verify_pkcs1v15(key: RsaPublicKey, message: &[u8], signature: &[u8]) -> bool {
    let Ok(signature) = Signature::try_from(signature) else {
        return false;
    };
    VerifyingKey::<Sha256>::new(key)
        .verify(message, &signature)
        .is_ok()
}

fn invalid_key(did: &Did) -> ResolveError {
    ResolveError::InvalidKey {
        did: did.to_string(),
        algorithm: RS256_ALG.to_string(),
    }
}
