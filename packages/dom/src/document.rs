//! # Document
//!
//! Owns the root element and ties every node it creates to one render sink and
//! one event pipeline. Dropping the document stops all of its observers.

use crate::config::PipelineConfig;
use crate::dispatcher::EventDispatcher;
use crate::errors::{DeliveryError, TreeResult};
use crate::event::{EventHandlers, EventPayload};
use crate::id::NodeId;
use crate::node::Node;
use crate::sink::RenderSink;
use std::sync::Arc;

/// Tag name of the element every document starts with
pub const ROOT_TAG: &str = "root";

pub struct Document {
    root: Node,
    sink: Arc<dyn RenderSink>,
    dispatcher: EventDispatcher,
}

impl Document {
    /// Create a document bound to the current tokio runtime
    pub fn new(sink: Arc<dyn RenderSink>, config: PipelineConfig) -> TreeResult<Self> {
        let dispatcher = EventDispatcher::current(config)?;
        Ok(Self::with_dispatcher(sink, dispatcher))
    }

    pub fn with_dispatcher(sink: Arc<dyn RenderSink>, dispatcher: EventDispatcher) -> Self {
        let root = Node::new_tag(
            ROOT_TAG.to_string(),
            EventHandlers::new(),
            sink.clone(),
            dispatcher.clone(),
        );
        dispatcher.register(&root);

        Self {
            root,
            sink,
            dispatcher,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// New detached element
    pub fn create_tag(&self, tag: impl Into<String>, handlers: EventHandlers) -> Node {
        Node::new_tag(
            tag.into(),
            handlers,
            self.sink.clone(),
            self.dispatcher.clone(),
        )
    }

    /// New detached text node; the initial value is forwarded like any other set
    pub fn create_text(&self, value: impl Into<String>) -> Node {
        let node = Node::new_text(self.sink.clone(), self.dispatcher.clone());
        if let Ok(text) = node.as_text() {
            node.store_value(text, value.into());
        }
        node
    }

    /// Depth-first lookup of an attached node
    pub fn find(&self, id: NodeId) -> Option<Node> {
        let mut stack = vec![self.root.clone()];

        while let Some(node) = stack.pop() {
            if node.id() == id {
                return Some(node);
            }
            if let Ok(children) = node.children() {
                stack.extend(children.into_iter().rev());
            }
        }

        None
    }

    /// Route a decoded inbound payload to the node it was addressed to
    pub async fn deliver(&self, node: NodeId, payload: EventPayload) -> Result<(), DeliveryError> {
        self.dispatcher.deliver(node, payload).await
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        self.dispatcher.shutdown();
    }
}
