//! Error types for DID resolution.

use thiserror::Error;

/// Errors raised while resolving a DID to a verifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The string is not a well formed DID, or its key material cannot be
    /// decoded.
    #[error("malformed DID '{did}': {reason}")]
    MalformedIdentifier {
        /// The offending identifier.
        did: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No registered plugin handles this DID.
    #[error("DID method not supported by plugins: {0}")]
    UnsupportedMethod(String),

    /// The key bytes embedded in the DID are not a valid key for the
    /// algorithm selected by their prefix.
    #[error("invalid {algorithm} key in '{did}'")]
    InvalidKey {
        /// The offending identifier.
        did: String,
        /// The algorithm selected by the key prefix.
        algorithm: String,
    },
}

impl ResolveError {
    pub(crate) fn malformed(did: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            did: did.into(),
            reason: reason.into(),
        }
    }
}
