//! # Event Pipeline
//!
//! Every live node gets one observer: a bounded inbound channel plus a tokio
//! task that drains it and hands each payload to the node's callback for
//! that event kind. Payloads with no matching callback are dropped.
//!
//! ```text
//! transport ──deliver(id, payload)──▶ routing table ──▶ channel ──▶ consumer task ──▶ callback
//! ```
//!
//! Registration and unregistration are the only ways an observer is created
//! or destroyed. Dropping an [`Observer`] stops its task, so removing it from
//! the routing table (or dropping the whole dispatcher) always releases the
//! task and the channel.
//!
//! After `unregister` returns no new dispatch starts for that node. A payload
//! that the consumer had already passed the activity check for may still run
//! to completion; its callback stays valid after detachment.

use crate::config::PipelineConfig;
use crate::errors::{DeliveryError, TreeError, TreeResult};
use crate::event::{EventHandlers, EventPayload};
use crate::id::NodeId;
use crate::node::{lock, Node};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

/// Routes inbound payloads to per-node consumer tasks
#[derive(Clone)]
pub struct EventDispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    runtime: Handle,
    config: PipelineConfig,
    observers: Mutex<HashMap<NodeId, Observer>>,
}

struct Observer {
    sender: mpsc::Sender<EventPayload>,
    active: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
        self.task.abort();
    }
}

impl EventDispatcher {
    pub fn new(runtime: Handle, config: PipelineConfig) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                runtime,
                config,
                observers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Bind to the runtime of the calling context
    pub fn current(config: PipelineConfig) -> TreeResult<Self> {
        let runtime = Handle::try_current().map_err(|_| TreeError::NoRuntime)?;
        Ok(Self::new(runtime, config))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.inner.config
    }

    pub(crate) fn same_as(&self, other: &EventDispatcher) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Start observing `node`. Returns false if it was already registered.
    pub fn register(&self, node: &Node) -> bool {
        let id = node.id();
        let mut observers = lock(&self.inner.observers);

        if observers.contains_key(&id) {
            return false;
        }

        let (sender, receiver) = mpsc::channel(self.inner.config.channel_capacity.max(1));
        let active = Arc::new(AtomicBool::new(true));
        let task = self.inner.runtime.spawn(consume(
            id,
            node.shared_handlers(),
            receiver,
            active.clone(),
        ));

        observers.insert(
            id,
            Observer {
                sender,
                active,
                task,
            },
        );

        tracing::debug!(node = %id, "registered event observer");
        true
    }

    /// Stop observing `node`. Returns false if it was not registered.
    pub fn unregister(&self, node: NodeId) -> bool {
        let observer = lock(&self.inner.observers).remove(&node);

        match observer {
            Some(observer) => {
                // Stops the task outside the routing-table lock
                drop(observer);
                tracing::debug!(node = %node, "unregistered event observer");
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, node: NodeId) -> bool {
        lock(&self.inner.observers).contains_key(&node)
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.inner.observers).len()
    }

    fn sender_for(&self, node: NodeId) -> Result<mpsc::Sender<EventPayload>, DeliveryError> {
        lock(&self.inner.observers)
            .get(&node)
            .map(|observer| observer.sender.clone())
            .ok_or(DeliveryError::NotRegistered(node))
    }

    /// Queue `payload` for `node`, waiting for channel capacity
    pub async fn deliver(&self, node: NodeId, payload: EventPayload) -> Result<(), DeliveryError> {
        let sender = self.sender_for(node).map_err(|e| {
            tracing::warn!(node = %node, kind = %payload.descriptor, "dropping event for unregistered node");
            e
        })?;

        sender
            .send(payload)
            .await
            .map_err(|_| DeliveryError::Closed(node))
    }

    /// Queue `payload` for `node` without waiting
    pub fn try_deliver(&self, node: NodeId, payload: EventPayload) -> Result<(), DeliveryError> {
        let sender = self.sender_for(node)?;

        match sender.try_send(payload) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(payload)) => {
                tracing::warn!(node = %node, kind = %payload.descriptor, "inbound channel full");
                Err(DeliveryError::Full(node))
            }
            Err(TrySendError::Closed(_)) => Err(DeliveryError::Closed(node)),
        }
    }

    /// Unregister every observer
    pub fn shutdown(&self) {
        let observers: Vec<(NodeId, Observer)> = lock(&self.inner.observers).drain().collect();

        if !observers.is_empty() {
            tracing::debug!(count = observers.len(), "shutting down event observers");
        }
    }
}

/// Register `node` and every descendant that is not yet observed
pub(crate) fn register_subtree(dispatcher: &EventDispatcher, node: &Node) {
    dispatcher.register(node);

    if let Ok(children) = node.children() {
        for child in &children {
            register_subtree(dispatcher, child);
        }
    }
}

/// Unregister `node` and its whole subtree, parent before children
pub(crate) fn unregister_subtree(dispatcher: &EventDispatcher, node: &Node) {
    dispatcher.unregister(node.id());

    if let Ok(children) = node.children() {
        for child in &children {
            unregister_subtree(dispatcher, child);
        }
    }
}

async fn consume(
    node: NodeId,
    handlers: Arc<EventHandlers>,
    mut receiver: mpsc::Receiver<EventPayload>,
    active: Arc<AtomicBool>,
) {
    while let Some(payload) = receiver.recv().await {
        if !active.load(Ordering::Acquire) {
            break;
        }

        if !handlers.dispatch(&payload) {
            tracing::trace!(node = %node, kind = %payload.descriptor, "no handler for event, dropped");
        }
    }

    tracing::trace!(node = %node, "event observer stopped");
}
