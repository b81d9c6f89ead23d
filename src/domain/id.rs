//! Normalized node identifiers

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a tree node.
///
/// Always stored normalized: surrounding whitespace trimmed, lowercased.
/// Two ids that differ only in case or padding are the same id.
/// The empty id means "no node" (e.g. the parent of a root).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize(raw.as_ref()))
    }

    /// The empty id (root parent marker).
    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trim + lowercase.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for NodeId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&String> for NodeId {
    fn from(raw: &String) -> Self {
        Self::new(raw)
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(NodeId::new).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_lowercases() {
        assert_eq!(NodeId::new("  NodeA ").as_str(), "nodea");
        assert_eq!(NodeId::new("A"), NodeId::new("a"));
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(NodeId::new("   ").is_empty());
        assert!(NodeId::root().is_empty());
    }

    #[test]
    fn test_deserialize_null_as_empty() {
        let id: NodeId = serde_json::from_str("null").unwrap();
        assert!(id.is_empty());
        let id: NodeId = serde_json::from_str("\" AB \"").unwrap();
        assert_eq!(id.as_str(), "ab");
    }
}
