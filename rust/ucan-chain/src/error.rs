//! Error types for token validation and chain resolution.

use crate::time::Timestamp;
use thiserror::Error;
use ucan_did::ResolveError;

/// Result alias for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while validating a token or resolving its chain.
///
/// Every variant aborts validation of the token it occurred in, and of the
/// whole chain containing it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An issuer or audience is not a well formed DID.
    #[error("malformed DID '{did}': {reason}")]
    MalformedIdentifier {
        /// The offending identifier.
        did: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The encoded token could not be decoded.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// No verifier plugin handles the issuer DID.
    #[error("DID method not supported by plugins: {0}")]
    UnsupportedMethod(String),

    /// The header algorithm does not match the issuer's key type.
    #[error("algorithm '{alg}' is not valid for issuer {issuer}")]
    InvalidAlgorithm {
        /// The issuer DID.
        issuer: String,
        /// The declared algorithm.
        alg: String,
    },

    /// The signature does not verify against the issuer.
    #[error("invalid signature from issuer {issuer}")]
    InvalidSignature {
        /// The issuer DID.
        issuer: String,
    },

    /// The token is not valid yet.
    #[error("token is not valid before {not_before}")]
    NotYetValid {
        /// The token's `nbf`.
        not_before: Timestamp,
    },

    /// The token has expired.
    #[error("token expired at {expiration}")]
    Expired {
        /// The token's `exp`.
        expiration: Timestamp,
    },

    /// A proof is not linked to the token citing it.
    #[error("proof[{index}] audience {audience} does not match issuer {issuer}")]
    ProofChainInvalid {
        /// Position of the proof in the citing token's `prf`.
        index: usize,
        /// The proof's audience.
        audience: String,
        /// The citing token's issuer.
        issuer: String,
    },

    /// Proofs are nested deeper than allowed.
    #[error("proof chain is deeper than {limit} levels")]
    ProofChainTooDeep {
        /// The configured depth limit.
        limit: usize,
    },
}

impl From<ResolveError> for Error {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::MalformedIdentifier { did, reason } => {
                Error::MalformedIdentifier { did, reason }
            }
            ResolveError::InvalidKey { did, algorithm } => Error::MalformedIdentifier {
                did,
                reason: format!("invalid {algorithm} key"),
            },
            ResolveError::UnsupportedMethod(did) => Error::UnsupportedMethod(did),
        }
    }
}
