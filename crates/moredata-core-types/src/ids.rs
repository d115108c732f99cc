//! Identifier types
//!
//! `EntityId` is the stable identity used to match records across result
//! snapshots. `ResultSetId` correlates log events emitted by one live result set.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a stored record
///
/// Ordering and hashing follow the underlying string, so ids can key both
/// `HashMap` and `BTreeMap` indexes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a new random EntityId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of one live result set instance, carried on its log events
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultSetId(String);

impl ResultSetId {
    /// Generate a new random ResultSetId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ResultSetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResultSetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_generation() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_entity_id_from_str() {
        let id = EntityId::from("person-1");
        assert_eq!(id.as_str(), "person-1");
        assert_eq!(format!("{}", id), "person-1");
        assert_eq!(id, EntityId::from_string("person-1".to_string()));
    }

    #[test]
    fn test_entity_id_ordering_follows_string() {
        let a = EntityId::from("a");
        let b = EntityId::from("b");
        assert!(a < b);
    }

    #[test]
    fn test_result_set_id_generation() {
        let id1 = ResultSetId::new();
        let id2 = ResultSetId::new();

        assert_ne!(id1, id2);
        assert_eq!(format!("{}", id1), id1.as_str());
    }

    #[test]
    fn test_serialization() {
        let id = EntityId::from("e-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"e-42\"");
        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
