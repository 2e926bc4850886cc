//! Raw capability records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A capability as it appears in a token's `att` field: an open JSON
/// object, typically naming a resource and an action.
///
/// The record carries no meaning on its own. A
/// [`CapabilitySemantics`](crate::CapabilitySemantics) decides whether it
/// belongs to a vocabulary and how it may be delegated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(pub Map<String, Value>);

impl Capability {
    /// An empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous value under `key`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a string field.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Capability {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
