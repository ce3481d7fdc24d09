//! Correlation types for import run tracking
//!
//! Every import run gets a `RunId` that ties together its log events and
//! the provenance rows written for it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single import run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new RunId using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through one import run
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: RunId,
    /// Destination table of the run
    pub table: String,
}

impl RunContext {
    /// Create a new context with a fresh RunId
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            run_id: RunId::new(),
            table: table.into(),
        }
    }

    /// Create a context with an existing RunId
    pub fn with_run_id(run_id: RunId, table: impl Into<String>) -> Self {
        Self {
            run_id,
            table: table.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_generation() {
        let id1 = RunId::new();
        let id2 = RunId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_run_id_display() {
        let id = RunId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_run_ids_are_time_ordered() {
        let first = RunId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = RunId::new();
        assert!(first.as_str() < second.as_str());
    }

    #[test]
    fn test_run_context_carries_table() {
        let ctx = RunContext::new("case_types");
        assert_eq!(ctx.table, "case_types");
        assert!(!ctx.run_id.as_str().is_empty());
    }

    #[test]
    fn test_serialization() {
        let id = RunId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: RunId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
