//! Capability attenuation along a proof chain.
//!
//! A token may only grant what its issuer holds. Walking a [`Chained`]
//! tree from the leaves up, each capability a token declares is matched
//! against what its proofs delegated to the issuer. Every proof lineage
//! that covers it yields one result, carrying the originator at the far end
//! of that lineage and the intersection of all validity windows along it. A
//! capability no proof covers is self-certified: its originator is the
//! token's own issuer.

use crate::{
    capability::Capability,
    chain::Chained,
    time::{Expiration, Timestamp},
    token::Token,
};
use ucan_did::Did;

/// A capability vocabulary.
///
/// `C` is the vocabulary's own typed capability; the engine never looks
/// inside it.
pub trait CapabilitySemantics<C> {
    /// Interpret a raw capability record, or `None` if it is not part of
    /// this vocabulary.
    fn try_parse(&self, capability: &Capability) -> Option<C>;

    /// Whether a holder of `parent` may grant `child`.
    ///
    /// Returns the capability actually granted, which may be narrower than
    /// `child`, or `None` if `child` would be an escalation.
    fn try_delegate(&self, parent: &C, child: &C) -> Option<C>;
}

/// Provenance of an attenuated capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityInfo {
    /// The issuer that held the capability without needing a proof.
    pub originator: Did,

    /// Start of validity; `None` is unbounded.
    pub not_before: Option<Timestamp>,

    /// End of validity.
    pub expires_at: Expiration,
}

impl CapabilityInfo {
    /// Provenance of a capability self-certified by the token's issuer.
    #[must_use]
    pub fn issued_by(token: &Token) -> Self {
        Self {
            originator: token.issuer().clone(),
            not_before: token.not_before(),
            expires_at: token.expiration(),
        }
    }

    /// Keep this originator, narrowing the validity window to the overlap
    /// with `other`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            originator: self.originator.clone(),
            not_before: self.not_before.max(other.not_before),
            expires_at: self.expires_at.min(other.expires_at),
        }
    }

    /// Whether this grant has the same originator as `claim` and a window
    /// that contains the claimed one.
    #[must_use]
    pub fn covers(&self, claim: &Self) -> bool {
        self.originator == claim.originator
            && self.not_before <= claim.not_before
            && self.expires_at >= claim.expires_at
    }
}

/// A capability together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityWithInfo<C> {
    /// The capability.
    pub capability: C,

    /// Where it comes from and when it is valid.
    pub info: CapabilityInfo,
}

/// Compute every capability the token at the root of `chain` holds, with
/// one result per proof lineage.
///
/// Results follow the order capabilities are declared in the root token,
/// then the order of proofs, depth first. Records the vocabulary does not
/// parse are skipped. The result depends only on `chain`, so calling this
/// again yields the same sequence.
pub fn attenuate<C, S>(semantics: &S, chain: &Chained) -> Vec<CapabilityWithInfo<C>>
where
    S: CapabilitySemantics<C> + ?Sized,
{
    let delegated: Vec<CapabilityWithInfo<C>> = chain
        .proofs()
        .iter()
        .flat_map(|proof| attenuate(semantics, proof))
        .collect();
    let own = CapabilityInfo::issued_by(chain.token());

    let mut results = Vec::new();
    for raw in chain.token().capabilities() {
        let Some(capability) = semantics.try_parse(raw) else {
            continue;
        };

        let mut covered = false;
        for parent in &delegated {
            if let Some(granted) = semantics.try_delegate(&parent.capability, &capability) {
                covered = true;
                results.push(CapabilityWithInfo {
                    capability: granted,
                    info: parent.info.intersect(&own),
                });
            }
        }

        if !covered {
            results.push(CapabilityWithInfo {
                capability,
                info: own.clone(),
            });
        }
    }
    results
}

/// Find a lineage in `chain` that grants `claim`.
///
/// A result matches when its capability can be delegated down to the
/// claimed one, it has the claimed originator, and its validity window
/// contains the claimed window. Returns the first match, or `None` when the
/// chain does not grant the claim; that is an ordinary answer, not an
/// error.
pub fn has_capability<C, S>(
    semantics: &S,
    claim: &CapabilityWithInfo<C>,
    chain: &Chained,
) -> Option<CapabilityWithInfo<C>>
where
    S: CapabilitySemantics<C> + ?Sized,
{
    attenuate(semantics, chain).into_iter().find(|held| {
        held.info.covers(&claim.info)
            && semantics
                .try_delegate(&held.capability, &claim.capability)
                .is_some()
    })
}
