//! # Node Descriptions
//!
//! Transport-ready snapshots. [`Node::to_description`] is shallow; callers
//! that need children recurse themselves, or use [`describe_tree`] which
//! does exactly that for the initial sync of a freshly connected client.

use crate::event::EventKind;
use crate::id::NodeId;
use crate::node::{lock, Attributes, Node, NodeKind};
use serde::{Deserialize, Serialize};

/// Wire record for a single node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeDescription {
    Tag {
        id: NodeId,
        tag: String,
        attributes: Attributes,
        events: Vec<EventKind>,
    },
    Text {
        id: NodeId,
        value: String,
    },
}

impl NodeDescription {
    pub fn id(&self) -> NodeId {
        match self {
            NodeDescription::Tag { id, .. } | NodeDescription::Text { id, .. } => *id,
        }
    }
}

/// Description of a node together with its descendants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDescription {
    #[serde(flatten)]
    pub node: NodeDescription,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeDescription>,
}

impl Node {
    /// Shallow snapshot; children are not included
    pub fn to_description(&self) -> NodeDescription {
        match &self.inner.kind {
            NodeKind::Tag(tag) => NodeDescription::Tag {
                id: self.id(),
                tag: tag.tag.clone(),
                attributes: lock(&tag.attributes).clone(),
                events: self.event_kinds(),
            },
            NodeKind::Text(text) => NodeDescription::Text {
                id: self.id(),
                value: lock(&text.value).clone(),
            },
        }
    }
}

pub fn describe_tree(node: &Node) -> TreeDescription {
    let children = node
        .children()
        .map(|children| children.iter().map(describe_tree).collect())
        .unwrap_or_default();

    TreeDescription {
        node: node.to_description(),
        children,
    }
}
