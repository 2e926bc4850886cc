//! Verifier plugins and the registry that dispatches to them.

use crate::{
    did::{Did, KEY_METHOD},
    error::ResolveError,
};
use async_trait::async_trait;
use std::{collections::HashMap, fmt, sync::Arc};

/// Verifies signatures for one `did:key` key type.
///
/// A key plugin is selected when its [`prefix`](KeyPlugin::prefix) is a
/// byte prefix of the decoded `did:key` material.
#[async_trait]
pub trait KeyPlugin: Send + Sync {
    /// Multicodec prefix identifying the key type.
    fn prefix(&self) -> &[u8];

    /// The JWT `alg` value tokens signed with this key type must declare.
    fn jwt_alg(&self) -> &str;

    /// Verify `signature` over `message` with the raw `public_key` (the key
    /// material with the prefix already stripped).
    ///
    /// Returns `Ok(false)` for a well formed but wrong signature.
    async fn verify(
        &self,
        did: &Did,
        public_key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, ResolveError>;
}

/// Verifies signatures for a whole DID method (e.g. `did:web`).
///
/// Method plugins may perform I/O to look up key material.
#[async_trait]
pub trait MethodPlugin: Send + Sync {
    /// Whether `alg` is an acceptable algorithm for `did`.
    fn check_alg(&self, did: &Did, alg: &str) -> bool;

    /// Verify `signature` over `message` as made by the controller of `did`.
    async fn verify(
        &self,
        did: &Did,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, ResolveError>;
}

enum Resolved<'a> {
    Key {
        plugin: &'a dyn KeyPlugin,
        public_key: Vec<u8>,
    },
    Method(&'a dyn MethodPlugin),
}

/// Registry of verifier plugins.
///
/// Construct it once before any verification, wrap it in an [`Arc`] and
/// share it. There is no way to mutate a registry through a shared
/// reference; replacing it means building a new one.
#[derive(Clone, Default)]
pub struct Plugins {
    keys: Vec<Arc<dyn KeyPlugin>>,
    methods: HashMap<String, Arc<dyn MethodPlugin>>,
}

impl Plugins {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every key plugin enabled by crate features.
    #[must_use]
    pub fn standard() -> Self {
        let plugins = Self::new();
        #[cfg(feature = "ed25519")]
        let plugins = plugins.with_key(crate::ed25519::Ed25519Plugin);
        #[cfg(feature = "es256")]
        let plugins = plugins.with_key(crate::es256::P256Plugin);
        #[cfg(feature = "rs256")]
        let plugins = plugins
            .with_key(crate::rs256::Rs256Plugin)
            .with_key(crate::rs256::LegacyRs256Plugin);
        plugins
    }

    /// Register a key plugin. Earlier registrations win when prefixes
    /// overlap.
    #[must_use]
    pub fn with_key(mut self, plugin: impl KeyPlugin + 'static) -> Self {
        self.keys.push(Arc::new(plugin));
        self
    }

    /// Register a method plugin under `method`, replacing any previous one.
    #[must_use]
    pub fn with_method(
        mut self,
        method: impl Into<String>,
        plugin: impl MethodPlugin + 'static,
    ) -> Self {
        self.methods.insert(method.into(), Arc::new(plugin));
        self
    }

    /// Check that `alg` is the algorithm the key type of `did` signs with.
    ///
    /// # Errors
    ///
    /// Fails if the DID is malformed or no plugin handles it.
    pub fn verify_issuer_alg(&self, did: &Did, alg: &str) -> Result<bool, ResolveError> {
        Ok(match self.resolve(did)? {
            Resolved::Key { plugin, .. } => plugin.jwt_alg() == alg,
            Resolved::Method(plugin) => plugin.check_alg(did, alg),
        })
    }

    /// Verify a signature made by the controller of `did`.
    ///
    /// # Errors
    ///
    /// Fails if the DID is malformed or no plugin handles it. An incorrect
    /// signature is `Ok(false)`, not an error.
    pub async fn verify_signature(
        &self,
        did: &Did,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, ResolveError> {
        match self.resolve(did)? {
            Resolved::Key { plugin, public_key } => {
                plugin.verify(did, &public_key, message, signature).await
            }
            Resolved::Method(plugin) => plugin.verify(did, message, signature).await,
        }
    }

    fn resolve(&self, did: &Did) -> Result<Resolved<'_>, ResolveError> {
        if did.method() == KEY_METHOD {
            let bytes = did.key_bytes()?;
            for plugin in &self.keys {
                if let Some(public_key) = bytes.strip_prefix(plugin.prefix()) {
                    tracing::trace!(%did, alg = plugin.jwt_alg(), "resolved did:key plugin");
                    return Ok(Resolved::Key {
                        plugin: plugin.as_ref(),
                        public_key: public_key.to_vec(),
                    });
                }
            }
        } else if let Some(plugin) = self.methods.get(did.method()) {
            tracing::trace!(%did, method = did.method(), "resolved DID method plugin");
            return Ok(Resolved::Method(plugin.as_ref()));
        }
        tracing::debug!(%did, "no plugin handles DID");
        Err(ResolveError::UnsupportedMethod(did.to_string()))
    }
}

impl fmt::Debug for Plugins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.keys.iter().map(|k| k.jwt_alg()).collect();
        let mut methods: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("Plugins")
            .field("keys", &keys)
            .field("methods", &methods)
            .finish()
    }
}
