//! # Mirror DOM
//!
//! Server-side mirror of a remotely rendered document tree.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ composition layer (external)                │
//! │  decides what the tree should look like     │
//! └─────────────────────────────────────────────┘
//!          ↓ insert / move / remove / set
//! ┌─────────────────────────────────────────────┐
//! │ mirror-dom                                  │
//! │  - Node tree (Tag / Text, weak parents)     │
//! │  - Structural mutations                     │
//! │  - Change propagation → RenderSink          │
//! │  - Per-node event observers (tokio tasks)   │
//! │  - Node descriptions for the wire           │
//! └─────────────────────────────────────────────┘
//!          ↓ RenderCommand        ↑ EventPayload
//! ┌─────────────────────────────────────────────┐
//! │ transport (external) ↔ remote client        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mirror_dom::{ChannelSink, Document, EventData, EventHandlers, EventPayload, PipelineConfig};
//! use std::sync::Arc;
//!
//! let (sink, commands) = ChannelSink::new();
//! let doc = Document::new(Arc::new(sink), PipelineConfig::default())?;
//!
//! let label = doc.create_text("0 clicks");
//! let button = doc.create_tag("button", EventHandlers::new().on("click", |_| {}));
//! button.insert_at(0, &label)?;
//! doc.root().insert_at(0, &button)?;
//!
//! doc.deliver(button.id(), EventPayload::new("click", EventData::Focus)).await?;
//! ```
//!
//! Structural mutations assume a single writer per tree; the composition
//! layer serializes its own calls.

mod config;
mod description;
mod dispatcher;
mod document;
mod errors;
mod event;
mod id;
mod mutator;
mod node;
mod sink;

pub use config::{PipelineConfig, DEFAULT_CONFIG_NAME};
pub use description::{describe_tree, NodeDescription, TreeDescription};
pub use dispatcher::EventDispatcher;
pub use document::{Document, ROOT_TAG};
pub use errors::{ConfigError, DeliveryError, TreeError, TreeResult};
pub use event::{EventCallback, EventData, EventHandlers, EventKind, EventPayload};
pub use id::NodeId;
pub use node::{Attributes, Node, TEXT_VALUE_FIELD};
pub use sink::{ChannelSink, RecordingSink, RenderCommand, RenderSink};
