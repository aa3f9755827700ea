//! JSON-lines messages exchanged with whoever drives the playground

use mirror_dom::{EventPayload, NodeId, RenderCommand, TreeDescription};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Inbound {
    /// A decoded UI event addressed to one node
    Event { node: NodeId, payload: EventPayload },

    /// Ask for a tree snapshot (whole document when `node` is absent)
    Describe {
        #[serde(default)]
        node: Option<NodeId>,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Outbound {
    Snapshot { tree: TreeDescription },
    Render { command: RenderCommand },
    Error { message: String },
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    timestamp: i64,
    #[serde(flatten)]
    message: &'a Outbound,
}

pub fn emit(message: &Outbound) {
    let envelope = Envelope {
        timestamp: chrono::Utc::now().timestamp_millis(),
        message,
    };

    match serde_json::to_string(&envelope) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::error!("Failed to encode outbound message: {}", e),
    }
}
