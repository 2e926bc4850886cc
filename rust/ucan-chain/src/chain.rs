//! Proof chain resolution.
//!
//! A [`Chained`] is a validated token together with its validated proofs,
//! each of which is itself a [`Chained`]. Every node owns its children: a
//! proof is re-decoded from its own encoded text wherever it is cited, so
//! the tree never shares or cycles, and its size is bounded by the
//! validator's `max_proof_depth`.

use crate::{
    attenuation::{CapabilitySemantics, CapabilityWithInfo, attenuate},
    error::{Error, Result},
    time::Clock,
    token::Token,
    validator::Validator,
};
use futures::{
    FutureExt,
    future::{BoxFuture, try_join_all},
};
use ucan_did::Did;

/// A validated token and its validated proofs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chained {
    encoded: String,
    token: Token,
    proofs: Vec<Chained>,
}

impl Chained {
    /// Decode and validate `encoded` and, recursively, all of its proofs.
    ///
    /// Shorthand for [`Validator::resolve`].
    ///
    /// # Errors
    ///
    /// See [`Validator::resolve`].
    pub async fn resolve<C: Clock>(encoded: &str, validator: &Validator<C>) -> Result<Self> {
        validator.resolve(encoded).await
    }

    /// The encoded token this node was resolved from.
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// The validated token at this node.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// Resolved proofs, in the order the token cites them.
    #[must_use]
    pub fn proofs(&self) -> &[Chained] {
        &self.proofs
    }

    /// Issuer of the token at this node.
    #[must_use]
    pub const fn issuer(&self) -> &Did {
        self.token.issuer()
    }

    /// Audience of the token at this node.
    #[must_use]
    pub const fn audience(&self) -> &Did {
        self.token.audience()
    }

    /// Number of proof levels below this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.proofs
            .iter()
            .map(|proof| proof.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Capabilities of this token with their provenance.
    ///
    /// Shorthand for [`attenuate`].
    #[must_use]
    pub fn attenuate<C, S>(&self, semantics: &S) -> Vec<CapabilityWithInfo<C>>
    where
        S: CapabilitySemantics<C> + ?Sized,
    {
        attenuate(semantics, self)
    }
}

impl<C: Clock> Validator<C> {
    /// Decode and validate `encoded` and, recursively, every proof it cites.
    ///
    /// Each proof must be addressed to the issuer of the token citing it.
    /// Proofs are resolved concurrently; the resulting tree keeps the order
    /// in which they are cited.
    ///
    /// # Errors
    ///
    /// Returns the first failure from any token in the chain, or
    /// [`Error::ProofChainInvalid`] for a proof addressed to someone else,
    /// or [`Error::ProofChainTooDeep`] if proofs nest deeper than
    /// [`Settings::max_proof_depth`](crate::Settings::max_proof_depth).
    pub async fn resolve(&self, encoded: &str) -> Result<Chained> {
        self.resolve_at(encoded, 0).await
    }

    fn resolve_at<'a>(&'a self, encoded: &'a str, depth: usize) -> BoxFuture<'a, Result<Chained>> {
        async move {
            let limit = self.settings().max_proof_depth;
            if depth > limit {
                tracing::debug!(limit, "proof chain too deep");
                return Err(Error::ProofChainTooDeep { limit });
            }

            let token = self.validate(encoded).await?;
            let proofs = try_join_all(
                token
                    .proofs()
                    .iter()
                    .map(|proof| self.resolve_at(proof, depth + 1)),
            )
            .await?;

            for (index, proof) in proofs.iter().enumerate() {
                if proof.audience() != token.issuer() {
                    tracing::debug!(
                        index,
                        audience = %proof.audience(),
                        issuer = %token.issuer(),
                        "proof is not addressed to the issuer citing it"
                    );
                    return Err(Error::ProofChainInvalid {
                        index,
                        audience: proof.audience().to_string(),
                        issuer: token.issuer().to_string(),
                    });
                }
            }

            tracing::trace!(depth, issuer = %token.issuer(), proofs = proofs.len(), "resolved");
            Ok(Chained {
                encoded: encoded.to_string(),
                token,
                proofs,
            })
        }
        .boxed()
    }
}
