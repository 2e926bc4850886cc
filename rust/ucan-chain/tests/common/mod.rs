//! Shared fixtures: deterministic Ed25519 identities, a token drafting
//! helper that signs for real, and two small capability vocabularies.

#![allow(dead_code)]

use ed25519_dalek::{Signer, SigningKey};
use std::sync::Arc;
use ucan_chain::{
    Capability, CapabilitySemantics, Expiration, FixedClock, Header, Payload, Timestamp, Token,
    Validator,
};
use ucan_did::{Did, Plugins, ed25519::did_from_verifying_key};

/// The time every fixture validator believes it is.
pub const NOW: u64 = 1_700_000_000;

/// Default token lifetime.
pub const LIFETIME: u64 = 3_600;

/// A principal that can sign tokens.
#[derive(Clone)]
pub struct Identity {
    key: SigningKey,
    did: Did,
}

impl Identity {
    /// Create an identity from a seed byte (for deterministic tests).
    pub fn new(seed: u8) -> Self {
        let key = SigningKey::from_bytes(&[seed; 32]);
        let did = did_from_verifying_key(&key.verifying_key());
        Self { key, did }
    }

    pub fn did(&self) -> Did {
        self.did.clone()
    }
}

pub fn alice() -> Identity {
    Identity::new(1)
}

pub fn bob() -> Identity {
    Identity::new(2)
}

pub fn mallory() -> Identity {
    Identity::new(3)
}

/// A validator with the standard plugins and a clock stopped at [`NOW`].
pub fn validator() -> Validator<FixedClock> {
    Validator::new(Arc::new(Plugins::standard())).with_clock(FixedClock(Timestamp::from_unix(NOW)))
}

/// An unsigned token under construction.
pub struct Draft {
    key: SigningKey,
    header: Header,
    payload: Payload,
}

/// Start drafting a token from `issuer` to `audience`, valid for
/// [`LIFETIME`] seconds from [`NOW`].
pub fn draft(issuer: &Identity, audience: &Identity) -> Draft {
    Draft {
        key: issuer.key.clone(),
        header: Header::new("EdDSA"),
        payload: Payload::new(
            issuer.did(),
            audience.did(),
            Timestamp::from_unix(NOW + LIFETIME).into(),
        ),
    }
}

impl Draft {
    pub fn capability(mut self, capability: Capability) -> Self {
        self.payload.capabilities.push(capability);
        self
    }

    pub fn proof(mut self, proof: &Token) -> Self {
        self.payload.proofs.push(proof.encode());
        self
    }

    pub fn encoded_proof(mut self, encoded: &str) -> Self {
        self.payload.proofs.push(encoded.to_string());
        self
    }

    pub fn not_before(mut self, seconds: u64) -> Self {
        self.payload.not_before = Some(Timestamp::from_unix(seconds));
        self
    }

    pub fn expires_at(mut self, seconds: u64) -> Self {
        self.payload.expiration = Timestamp::from_unix(seconds).into();
        self
    }

    pub fn never_expires(mut self) -> Self {
        self.payload.expiration = Expiration::Never;
        self
    }

    pub fn alg(mut self, alg: &str) -> Self {
        self.header.alg = alg.to_string();
        self
    }

    pub fn audience(mut self, audience: Did) -> Self {
        self.payload.audience = audience;
        self
    }

    pub fn sign(self) -> Token {
        let input = Token::signing_input(&self.header, &self.payload).expect("serializable");
        let signature = self.key.sign(input.as_bytes());
        Token::new(self.header, self.payload, signature.to_bytes().to_vec()).expect("serializable")
    }
}

/// `{ "email": <address>, "cap": "SEND" }`
pub fn email_capability(address: &str) -> Capability {
    Capability::new().with("email", address).with("cap", "SEND")
}

/// Permission to send email as an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailCapability {
    pub email: String,
}

/// Email sending: a capability may only be delegated for the same address.
pub struct EmailSemantics;

impl CapabilitySemantics<EmailCapability> for EmailSemantics {
    fn try_parse(&self, capability: &Capability) -> Option<EmailCapability> {
        if capability.get_str("cap")? != "SEND" {
            return None;
        }
        Some(EmailCapability {
            email: capability.get_str("email")?.to_string(),
        })
    }

    fn try_delegate(
        &self,
        parent: &EmailCapability,
        child: &EmailCapability,
    ) -> Option<EmailCapability> {
        (parent.email == child.email).then(|| child.clone())
    }
}

/// Every record is a capability; a capability delegates only itself.
pub struct EqualitySemantics;

impl CapabilitySemantics<Capability> for EqualitySemantics {
    fn try_parse(&self, capability: &Capability) -> Option<Capability> {
        Some(capability.clone())
    }

    fn try_delegate(&self, parent: &Capability, child: &Capability) -> Option<Capability> {
        (parent == child).then(|| child.clone())
    }
}
