//! Node payloads and the host-facing node record

use serde::{Deserialize, Serialize};

use crate::domain::NodeId;

/// Data payload stored in the arena for every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub id: NodeId,
    /// Empty for root nodes
    pub parent_id: NodeId,
    pub text: String,
    pub icon_url: String,
    pub href: String,
    pub expanded: bool,
    pub checked: bool,
    pub selected: bool,
    pub visible: bool,
    pub disabled: bool,
}

impl NodeData {
    pub fn new(id: NodeId, parent_id: NodeId, text: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            text: text.into(),
            icon_url: String::new(),
            href: String::new(),
            expanded: false,
            checked: false,
            selected: false,
            visible: true,
            disabled: false,
        }
    }

    pub fn with_icon(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = icon_url.into();
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = href.into();
        self
    }

    /// Record view of this node without children.
    pub fn to_record(&self) -> NodeRecord {
        NodeRecord {
            node_id: self.id.clone(),
            parent_id: self.parent_id.clone(),
            text: self.text.clone(),
            icon_url: non_empty(&self.icon_url),
            href: non_empty(&self.href),
            expanded: Some(self.expanded),
            checked: Some(self.checked),
            selected: Some(self.selected),
            disabled: Some(self.disabled),
            visible: Some(self.visible),
            nodes: Vec::new(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Recursive node record exchanged with the host (JSON, camelCase).
///
/// An empty `nodes` sequence denotes a leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeRecord {
    pub node_id: NodeId,
    pub parent_id: NodeId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeRecord>,
}

impl NodeRecord {
    pub fn new(node_id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, nodes: Vec<NodeRecord>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parse a forest from JSON: either an array of records or a single record.
    pub fn parse_forest(json: &str) -> Result<Vec<NodeRecord>, serde_json::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Forest {
            Many(Vec<NodeRecord>),
            One(Box<NodeRecord>),
        }
        Ok(match serde_json::from_str::<Forest>(json)? {
            Forest::Many(nodes) => nodes,
            Forest::One(node) => vec![*node],
        })
    }
}
