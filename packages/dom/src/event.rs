//! # Events
//!
//! Inbound UI events as seen by a node. A payload names its kind through
//! `descriptor`; the node looks that kind up in its [`EventHandlers`] and, if
//! a callback exists, hands it the payload's data. Payload shape is checked
//! where the payload is decoded from the wire, not here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Event kind identifier (e.g. `"click"`, `"input"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKind(String);

impl EventKind {
    pub fn new(kind: impl Into<String>) -> Self {
        EventKind(kind.into())
    }

    pub fn click() -> Self {
        Self::new("click")
    }

    pub fn input() -> Self {
        Self::new("input")
    }

    pub fn keydown() -> Self {
        Self::new("keydown")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventKind {
    fn from(kind: &str) -> Self {
        EventKind::new(kind)
    }
}

/// Kind-specific event data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum EventData {
    #[serde(rename_all = "camelCase")]
    Mouse {
        client_x: f64,
        client_y: f64,
        #[serde(default)]
        button: i16,
    },

    Input { value: String },

    Key { key: String, code: String },

    Focus,

    /// Anything the decoder has no dedicated shape for
    Custom(serde_json::Value),
}

/// Inbound payload routed to a single node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    pub descriptor: EventKind,
    pub data: EventData,
}

impl EventPayload {
    pub fn new(descriptor: impl Into<EventKind>, data: EventData) -> Self {
        Self {
            descriptor: descriptor.into(),
            data,
        }
    }
}

pub type EventCallback = Arc<dyn Fn(&EventData) + Send + Sync>;

/// Callbacks keyed by event kind; fixed once the node is built
#[derive(Clone, Default)]
pub struct EventHandlers {
    handlers: BTreeMap<EventKind, EventCallback>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(mut self, kind: impl Into<EventKind>, callback: F) -> Self
    where
        F: Fn(&EventData) + Send + Sync + 'static,
    {
        self.handlers.insert(kind.into(), Arc::new(callback));
        self
    }

    /// Registered kinds in sorted order
    pub fn kinds(&self) -> Vec<EventKind> {
        self.handlers.keys().cloned().collect()
    }

    /// Invoke the callback for `payload`, if any. Returns whether one ran.
    pub fn dispatch(&self, payload: &EventPayload) -> bool {
        match self.handlers.get(&payload.descriptor) {
            Some(callback) => {
                callback(&payload.data);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}
