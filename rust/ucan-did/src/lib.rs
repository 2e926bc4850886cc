//! DID resolution and signature verification dispatch.
//!
//! A [`Plugins`] registry maps a [`Did`] to whatever can verify signatures
//! made by its controller. Two kinds of plugins are supported:
//!
//! - [`KeyPlugin`]s for `did:key`, selected by the multicodec prefix of the
//!   embedded key bytes.
//! - [`MethodPlugin`]s for any other DID method (e.g. `did:web`), selected
//!   by method name.
//!
//! The registry is built once and then shared read-only by every
//! verification.
//!
//! ```ignore
//! use std::sync::Arc;
//! use ucan_did::Plugins;
//!
//! let plugins = Arc::new(Plugins::standard());
//! let ok = plugins.verify_signature(&issuer, b"payload", &signature).await?;
//! ```

pub mod did;
pub mod error;
pub mod plugin;

#[cfg(feature = "ed25519")]
pub mod ed25519;

#[cfg(feature = "es256")]
pub mod es256;

#[cfg(feature = "rs256")]
pub mod rs256;

pub use did::*;
pub use error::*;
pub use plugin::*;
