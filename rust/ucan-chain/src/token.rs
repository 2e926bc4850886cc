//! Encoded tokens: header, payload and signature.
//!
//! The encoded form is three base64url (unpadded) segments joined by `.`:
//! the JSON header, the JSON payload and the raw signature bytes. The
//! signature covers the first two segments exactly as they appear in the
//! encoded text, so a decoded [`Token`] keeps them verbatim and never
//! re-serializes its parts for verification.

use crate::{
    capability::Capability,
    error::{Error, Result},
    time::{Expiration, Timestamp},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::str::FromStr;
use ucan_did::Did;

/// The fixed `typ` header value.
pub const TOKEN_TYPE: &str = "JWT";

/// Token header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signature algorithm, e.g. `EdDSA`.
    pub alg: String,

    /// Token type, always [`TOKEN_TYPE`].
    pub typ: String,

    /// Version of the token format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uav: Option<String>,
}

impl Header {
    /// A header for the given algorithm.
    #[must_use]
    pub fn new(alg: impl Into<String>) -> Self {
        Self {
            alg: alg.into(),
            typ: TOKEN_TYPE.to_string(),
            uav: None,
        }
    }
}

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Who signed the token.
    #[serde(rename = "iss")]
    pub issuer: Did,

    /// Who the token is addressed to.
    #[serde(rename = "aud")]
    pub audience: Did,

    /// Start of validity.
    #[serde(rename = "nbf", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<Timestamp>,

    /// End of validity; required, `null` meaning it never expires.
    #[serde(rename = "exp", deserialize_with = "Expiration::deserialize")]
    pub expiration: Expiration,

    /// Capabilities granted to the audience, in declaration order.
    #[serde(rename = "att")]
    pub capabilities: Vec<Capability>,

    /// Encoded tokens proving the issuer may grant the capabilities.
    #[serde(rename = "prf")]
    pub proofs: Vec<String>,

    /// Facts asserted by the issuer.
    #[serde(rename = "fct", default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<Vec<Value>>,

    /// Nonce.
    #[serde(rename = "nnc", default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

impl Payload {
    /// A payload with no capabilities, proofs, facts or nonce.
    #[must_use]
    pub fn new(issuer: Did, audience: Did, expiration: Expiration) -> Self {
        Self {
            issuer,
            audience,
            not_before: None,
            expiration,
            capabilities: Vec::new(),
            proofs: Vec::new(),
            facts: None,
            nonce: None,
        }
    }
}

/// A decoded token.
///
/// Equality compares the decoded parts and the exact signed segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    header: Header,
    payload: Payload,
    signature: Vec<u8>,
    signed_data: String,
}

impl Token {
    /// Assemble a token from its parts, serializing header and payload.
    ///
    /// `signature` must have been made over
    /// [`Token::signing_input`]`(&header, &payload)` for the token to
    /// validate.
    ///
    /// # Errors
    ///
    /// Fails if the parts cannot be serialized.
    pub fn new(header: Header, payload: Payload, signature: Vec<u8>) -> Result<Self> {
        let signed_data = Self::signing_input(&header, &payload)?;
        Ok(Self {
            header,
            payload,
            signature,
            signed_data,
        })
    }

    /// The two-segment string a signer signs.
    ///
    /// # Errors
    ///
    /// Fails if the parts cannot be serialized.
    pub fn signing_input(header: &Header, payload: &Payload) -> Result<String> {
        Ok(format!("{}.{}", encode_part(header)?, encode_part(payload)?))
    }

    /// Decode an encoded token without checking its signature or time
    /// bounds.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MalformedToken`] unless `encoded` is exactly three
    /// non-empty segments, the first two decoding to a header and payload
    /// and the third to signature bytes.
    pub fn decode(encoded: &str) -> Result<Self> {
        let segments: Vec<&str> = encoded.split('.').collect();
        let [header, payload, signature] = segments.as_slice() else {
            return Err(Error::MalformedToken(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };
        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(Error::MalformedToken("empty segment".to_string()));
        }

        let header: Header = decode_part("header", header)?;
        if header.typ != TOKEN_TYPE {
            return Err(Error::MalformedToken(format!(
                "unexpected token type '{}'",
                header.typ
            )));
        }
        let payload: Payload = decode_part("payload", payload)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|e| Error::MalformedToken(format!("signature is not base64url: {e}")))?;

        let signed_len = encoded.len() - segments[2].len() - 1;
        Ok(Self {
            header,
            payload,
            signature,
            signed_data: encoded[..signed_len].to_string(),
        })
    }

    /// The encoded three-segment form.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{}.{}",
            self.signed_data,
            URL_SAFE_NO_PAD.encode(&self.signature)
        )
    }

    /// Getter for the header.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Getter for the payload.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Getter for the raw signature bytes.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The header and payload segments the signature covers.
    #[must_use]
    pub fn signed_data(&self) -> &str {
        &self.signed_data
    }

    /// Getter for the `iss` field.
    #[must_use]
    pub const fn issuer(&self) -> &Did {
        &self.payload.issuer
    }

    /// Getter for the `aud` field.
    #[must_use]
    pub const fn audience(&self) -> &Did {
        &self.payload.audience
    }

    /// Getter for the `nbf` field.
    #[must_use]
    pub const fn not_before(&self) -> Option<Timestamp> {
        self.payload.not_before
    }

    /// Getter for the `exp` field.
    #[must_use]
    pub const fn expiration(&self) -> Expiration {
        self.payload.expiration
    }

    /// Getter for the `att` field.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.payload.capabilities
    }

    /// Getter for the `prf` field.
    #[must_use]
    pub fn proofs(&self) -> &[String] {
        &self.payload.proofs
    }

    /// Whether `now` is before the token's `nbf`.
    #[must_use]
    pub fn is_too_early(&self, now: Timestamp) -> bool {
        self.payload.not_before.is_some_and(|nbf| now < nbf)
    }

    /// Whether `now` is at or after the token's `exp`.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.payload.expiration.is_expired(now)
    }
}

impl FromStr for Token {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

fn encode_part<T: Serialize>(part: &T) -> Result<String> {
    let json = serde_json::to_vec(part)
        .map_err(|e| Error::MalformedToken(format!("unable to serialize: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_part<T: DeserializeOwned>(name: &str, segment: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| Error::MalformedToken(format!("{name} is not base64url: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::MalformedToken(format!("invalid {name}: {e}")))
}
