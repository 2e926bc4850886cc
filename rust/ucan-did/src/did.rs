//! DID (Decentralized Identifier) types.

use crate::error::ResolveError;
use base58::{FromBase58, ToBase58};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Scheme prefix shared by every DID.
pub const DID_PREFIX: &str = "did:";

/// Method name of the in-band key method.
pub const KEY_METHOD: &str = "key";

/// Prefix of a `did:key` whose key material is base58btc multibase encoded.
pub const BASE58_DID_PREFIX: &str = "did:key:z";

/// A [Decentralized Identifier][did-core] string.
///
/// Wraps a raw DID string like `did:key:z6Mk...` or `did:web:example.com`.
/// Values can only be created through [`FromStr`] (or the
/// [`Did::from_key_bytes`] constructor), so the method segment is always
/// present and non-empty. The method specific identifier may be empty.
///
/// [did-core]: https://www.w3.org/TR/did-core/
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Did(String);

impl Did {
    /// Build a `did:key` from a multicodec prefix and raw public key bytes.
    #[must_use]
    pub fn from_key_bytes(prefix: &[u8], key: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(prefix.len() + key.len());
        bytes.extend_from_slice(prefix);
        bytes.extend_from_slice(key);
        Did(format!("{BASE58_DID_PREFIX}{}", bytes.to_base58()))
    }

    /// Get the raw DID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the DID method name (e.g. `"key"` for `did:key:...`).
    #[must_use]
    pub fn method(&self) -> &str {
        let rest = &self.0[DID_PREFIX.len()..];
        rest.split_once(':').map_or(rest, |(method, _)| method)
    }

    /// Returns the method specific identifier (everything after the method).
    #[must_use]
    pub fn method_specific_id(&self) -> &str {
        let rest = &self.0[DID_PREFIX.len()..];
        rest.split_once(':').map_or("", |(_, id)| id)
    }

    /// Decode the multicodec prefixed key bytes of a `did:key`.
    ///
    /// # Errors
    ///
    /// Fails with [`ResolveError::MalformedIdentifier`] if this is not a
    /// base58btc `did:key` or the key material does not decode.
    pub fn key_bytes(&self) -> Result<Vec<u8>, ResolveError> {
        let encoded = self.0.strip_prefix(BASE58_DID_PREFIX).ok_or_else(|| {
            ResolveError::malformed(&self.0, "not a valid base58 formatted did:key")
        })?;
        encoded
            .from_base58()
            .map_err(|e| ResolveError::malformed(&self.0, format!("base58 decode failed: {e:?}")))
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Did {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(DID_PREFIX)
            .ok_or_else(|| ResolveError::malformed(s, "not a DID"))?;
        let method = rest.split_once(':').map_or(rest, |(method, _)| method);
        if method.is_empty() {
            return Err(ResolveError::malformed(s, "no DID method included"));
        }
        Ok(Did(s.to_string()))
    }
}

impl TryFrom<String> for Did {
    type Error = ResolveError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Serialize for Did {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Did {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
