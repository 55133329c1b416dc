use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Correlation ID assigned to every handled event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(String);

impl TraceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh trace ID
    ///
    /// Format: 32 lowercase hex chars, no dashes
    /// Example: 9f1c2e7a4b0d4c58a3e1f0b2c6d8e9a1
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
