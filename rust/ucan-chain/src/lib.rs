//! UCAN delegation chain validation and capability attenuation.
//!
//! The verification flow:
//!
//! 1. [`Token::decode`] splits the encoded token into header, payload and
//!    signature.
//! 2. [`Validator::validate`] checks the declared algorithm and signature
//!    against the issuer DID and checks the time bounds.
//! 3. [`Validator::resolve`] does the same for every proof, recursively,
//!    producing a [`Chained`] tree.
//! 4. [`attenuate`] walks the tree with a [`CapabilitySemantics`] and
//!    reports which capabilities reach the root and who originated them.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ucan_chain::{Validator, has_capability};
//! use ucan_did::Plugins;
//!
//! let validator = Validator::new(Arc::new(Plugins::standard()));
//! let chain = validator.resolve(&encoded).await?;
//! if let Some(held) = has_capability(&semantics, &claim, &chain) {
//!     println!("granted by {}", held.info.originator);
//! }
//! ```

pub mod attenuation;
pub mod capability;
pub mod chain;
pub mod error;
pub mod settings;
pub mod time;
pub mod token;
pub mod validator;

pub use attenuation::*;
pub use capability::*;
pub use chain::*;
pub use error::*;
pub use settings::*;
pub use time::*;
pub use token::*;
pub use validator::*;

pub use ucan_did::{Did, Plugins};
