//! # Render Sinks
//!
//! Where attribute and text changes go. Every setter on a node calls
//! [`RenderSink::update`] exactly once, synchronously, with the full new
//! field set. Sinks own retry and buffering; the tree never looks back.

use crate::id::NodeId;
use crate::node::Attributes;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Consumer of attribute/value change notifications
pub trait RenderSink: Send + Sync {
    fn update(&self, node: NodeId, fields: &Attributes);
}

/// Update command shipped to the remote client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderCommand {
    pub id: NodeId,
    pub fields: Attributes,
}

/// Forwards commands onto an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<RenderCommand>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RenderCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl RenderSink for ChannelSink {
    fn update(&self, node: NodeId, fields: &Attributes) {
        let command = RenderCommand {
            id: node,
            fields: fields.clone(),
        };

        if self.sender.send(command).is_err() {
            tracing::warn!(node = %node, "render command receiver dropped");
        }
    }
}

/// Keeps every command in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Mutex<Vec<RenderCommand>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<RenderCommand> {
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn commands_for(&self, node: NodeId) -> Vec<RenderCommand> {
        self.commands()
            .into_iter()
            .filter(|command| command.id == node)
            .collect()
    }

    pub fn clear(&self) {
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl RenderSink for RecordingSink {
    fn update(&self, node: NodeId, fields: &Attributes) {
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RenderCommand {
                id: node,
                fields: fields.clone(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, Option<&str>)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(|v| v.to_string())))
            .collect()
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        let a = NodeId::next();
        let b = NodeId::next();

        sink.update(a, &fields(&[("class", Some("x"))]));
        sink.update(b, &fields(&[("value", Some("hi"))]));
        sink.update(a, &fields(&[("class", None)]));

        let commands = sink.commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].id, a);
        assert_eq!(commands[1].id, b);
        assert_eq!(sink.commands_for(a).len(), 2);

        sink.clear();
        assert!(sink.commands().is_empty());
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (sink, mut receiver) = ChannelSink::new();
        let node = NodeId::next();

        sink.update(node, &fields(&[("value", Some("hi"))]));

        let command = receiver.try_recv().unwrap();
        assert_eq!(command.id, node);
        assert_eq!(command.fields.get("value"), Some(&Some("hi".to_string())));
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, receiver) = ChannelSink::new();
        drop(receiver);

        // Must not panic
        sink.update(NodeId::next(), &fields(&[("value", Some("lost"))]));
    }

    #[test]
    fn test_render_command_json() {
        let node = NodeId::next();
        let command = RenderCommand {
            id: node,
            fields: fields(&[("title", None)]),
        };

        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["id"], serde_json::json!(node.as_u64()));
        assert!(json["fields"]["title"].is_null());
    }
}
