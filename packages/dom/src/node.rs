//! # Node Tree
//!
//! A node is either an element (`Tag`) with attributes and ordered children,
//! or a `Text` node with a single value. [`Node`] is a cheap shared handle:
//! the composition layer keeps handles to the nodes it created while each
//! element exclusively owns the `children` list.
//!
//! ## Ownership
//!
//! ```text
//!   Tag ──children (strong)──▶ Node ──parent (weak)──▶ Tag
//! ```
//!
//! `parent` never keeps a node alive. A detached node has no parent.
//!
//! ## Change propagation
//!
//! `set_attributes` and `set_value` replace the stored value and forward it to
//! the render sink before returning: whole attribute map for elements,
//! `{"value": ..}` for text. Nothing is diffed or deduplicated.

use crate::dispatcher::EventDispatcher;
use crate::errors::{TreeError, TreeResult};
use crate::event::{EventHandlers, EventKind};
use crate::id::NodeId;
use crate::sink::RenderSink;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Attribute map; `None` values are attributes present without a value
pub type Attributes = HashMap<String, Option<String>>;

/// Field name used when forwarding a text node's value
pub const TEXT_VALUE_FIELD: &str = "value";

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared handle to a mirrored node
#[derive(Clone)]
pub struct Node {
    pub(crate) inner: Arc<NodeInner>,
}

pub(crate) struct NodeInner {
    pub(crate) id: NodeId,
    pub(crate) handlers: Arc<EventHandlers>,
    pub(crate) parent: Mutex<Weak<NodeInner>>,
    pub(crate) sink: Arc<dyn RenderSink>,
    pub(crate) dispatcher: EventDispatcher,
    pub(crate) kind: NodeKind,
}

pub(crate) enum NodeKind {
    Tag(TagNode),
    Text(TextNode),
}

pub(crate) struct TagNode {
    pub(crate) tag: String,
    pub(crate) attributes: Mutex<Attributes>,
    pub(crate) children: Mutex<Vec<Node>>,
}

pub(crate) struct TextNode {
    pub(crate) value: Mutex<String>,
}

impl Node {
    pub(crate) fn new_tag(
        tag: String,
        handlers: EventHandlers,
        sink: Arc<dyn RenderSink>,
        dispatcher: EventDispatcher,
    ) -> Self {
        Self::build(
            NodeKind::Tag(TagNode {
                tag,
                attributes: Mutex::new(Attributes::new()),
                children: Mutex::new(Vec::new()),
            }),
            handlers,
            sink,
            dispatcher,
        )
    }

    pub(crate) fn new_text(sink: Arc<dyn RenderSink>, dispatcher: EventDispatcher) -> Self {
        Self::build(
            NodeKind::Text(TextNode {
                value: Mutex::new(String::new()),
            }),
            EventHandlers::new(),
            sink,
            dispatcher,
        )
    }

    fn build(
        kind: NodeKind,
        handlers: EventHandlers,
        sink: Arc<dyn RenderSink>,
        dispatcher: EventDispatcher,
    ) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                id: NodeId::next(),
                handlers: Arc::new(handlers),
                parent: Mutex::new(Weak::new()),
                sink,
                dispatcher,
                kind,
            }),
        }
    }

    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    pub fn handlers(&self) -> &EventHandlers {
        &self.inner.handlers
    }

    pub(crate) fn shared_handlers(&self) -> Arc<EventHandlers> {
        self.inner.handlers.clone()
    }

    pub fn event_kinds(&self) -> Vec<EventKind> {
        self.inner.handlers.kinds()
    }

    pub fn is_tag(&self) -> bool {
        matches!(self.inner.kind, NodeKind::Tag(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.inner.kind, NodeKind::Text(_))
    }

    pub fn tag_name(&self) -> Option<&str> {
        match &self.inner.kind {
            NodeKind::Tag(tag) => Some(&tag.tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn parent(&self) -> Option<Node> {
        lock(&self.inner.parent)
            .upgrade()
            .map(|inner| Node { inner })
    }

    pub fn is_attached(&self) -> bool {
        lock(&self.inner.parent).strong_count() > 0
    }

    pub(crate) fn set_parent(&self, parent: Option<&Node>) {
        *lock(&self.inner.parent) = match parent {
            Some(parent) => Arc::downgrade(&parent.inner),
            None => Weak::new(),
        };
    }

    pub(crate) fn as_tag(&self) -> TreeResult<&TagNode> {
        match &self.inner.kind {
            NodeKind::Tag(tag) => Ok(tag),
            NodeKind::Text(_) => Err(TreeError::NotAnElement(self.id())),
        }
    }

    pub(crate) fn as_text(&self) -> TreeResult<&TextNode> {
        match &self.inner.kind {
            NodeKind::Text(text) => Ok(text),
            NodeKind::Tag(_) => Err(TreeError::NotText(self.id())),
        }
    }

    /// Snapshot of the element's children
    pub fn children(&self) -> TreeResult<Vec<Node>> {
        Ok(lock(&self.as_tag()?.children).clone())
    }

    pub fn child_count(&self) -> TreeResult<usize> {
        Ok(lock(&self.as_tag()?.children).len())
    }

    pub fn child_at(&self, index: usize) -> TreeResult<Option<Node>> {
        Ok(lock(&self.as_tag()?.children).get(index).cloned())
    }

    pub fn attributes(&self) -> TreeResult<Attributes> {
        Ok(lock(&self.as_tag()?.attributes).clone())
    }

    /// Replace the attribute map and forward it to the render sink
    pub fn set_attributes(&self, attributes: Attributes) -> TreeResult<()> {
        let tag = self.as_tag()?;
        *lock(&tag.attributes) = attributes.clone();

        tracing::trace!(node = %self.id(), count = attributes.len(), "forwarding attributes");
        self.inner.sink.update(self.id(), &attributes);
        Ok(())
    }

    pub fn value(&self) -> TreeResult<String> {
        Ok(lock(&self.as_text()?.value).clone())
    }

    /// Replace the text value and forward it to the render sink
    pub fn set_value(&self, value: impl Into<String>) -> TreeResult<()> {
        let text = self.as_text()?;
        self.store_value(text, value.into());
        Ok(())
    }

    pub(crate) fn store_value(&self, text: &TextNode, value: String) {
        *lock(&text.value) = value.clone();

        let mut fields = Attributes::new();
        fields.insert(TEXT_VALUE_FIELD.to_string(), Some(value));

        tracing::trace!(node = %self.id(), "forwarding text value");
        self.inner.sink.update(self.id(), &fields);
    }

    /// True when `self` is `other` or one of `other`'s descendants
    pub(crate) fn is_within(&self, other: &Node) -> bool {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node == *other {
                return true;
            }
            current = node.parent();
        }
        false
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Node {}

impl Drop for NodeInner {
    fn drop(&mut self) {
        // Last handle gone: the node can no longer be part of any tree
        self.dispatcher.unregister(self.id);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            NodeKind::Tag(tag) => f
                .debug_struct("Tag")
                .field("id", &self.id())
                .field("tag", &tag.tag)
                .field("events", &self.inner.handlers)
                .finish(),
            NodeKind::Text(text) => f
                .debug_struct("Text")
                .field("id", &self.id())
                .field("value", &*lock(&text.value))
                .finish(),
        }
    }
}
