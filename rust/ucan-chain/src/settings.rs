//! Validation settings.

use serde::{Deserialize, Serialize};

/// Default bound on proof nesting below the root token.
pub const DEFAULT_MAX_PROOF_DEPTH: usize = 64;

/// Settings applied to every token a [`Validator`](crate::Validator)
/// validates.
///
/// Missing fields take their defaults when deserialized, so a partial
/// configuration file is enough:
///
/// ```
/// let settings: ucan_chain::Settings =
///     serde_json::from_str(r#"{ "max_proof_depth": 8 }"#).unwrap();
/// assert_eq!(settings.max_proof_depth, 8);
/// assert!(settings.check_expiration);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// How many levels of proofs may be nested below the root token.
    #[serde(default = "default_max_proof_depth")]
    pub max_proof_depth: usize,

    /// Reject tokens whose `exp` has passed.
    #[serde(default = "default_true")]
    pub check_expiration: bool,

    /// Reject tokens whose `nbf` has not been reached.
    #[serde(default = "default_true")]
    pub check_not_before: bool,
}

fn default_max_proof_depth() -> usize {
    DEFAULT_MAX_PROOF_DEPTH
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_proof_depth: default_max_proof_depth(),
            check_expiration: true,
            check_not_before: true,
        }
    }
}
