//! # Structural Mutations
//!
//! `insert_at`, `move_children` and `remove` on an element's children.
//! Each operation validates before touching anything, so a failed call leaves
//! the tree unchanged.
//!
//! ## Move convention
//!
//! `move_children(from, to, count)` follows keyed-list reconciliation: `to` is
//! an index in the list *before* the run is taken out, and the run lands
//! immediately before the element originally at `to`.
//!
//! ```text
//! [A, B, C, D, E]  move_children(3, 1, 2)  →  [A, D, E, B, C]   (from > to: run at to)
//! [A, B, C, D, E]  move_children(0, 4, 2)  →  [C, D, A, B, E]   (from < to: run at to - count)
//! [A, B, C, D]     move_children(1, 3, 2)  →  [A, B, C, D]      (already before D)
//! ```

use crate::dispatcher::{register_subtree, unregister_subtree};
use crate::errors::{TreeError, TreeResult};
use crate::node::{lock, Node};

impl Node {
    /// Insert a detached `node` at `index`, adopt it and start observing it
    pub fn insert_at(&self, index: usize, node: &Node) -> TreeResult<()> {
        let tag = self.as_tag()?;

        if !self.inner.dispatcher.same_as(&node.inner.dispatcher) {
            return Err(TreeError::ForeignNode(node.id()));
        }
        if node.is_attached() {
            return Err(TreeError::AlreadyAttached(node.id()));
        }
        if self.is_within(node) {
            return Err(TreeError::CycleDetected(node.id()));
        }

        {
            let mut children = lock(&tag.children);
            if index > children.len() {
                return Err(TreeError::OutOfRange {
                    op: "insert",
                    index,
                    count: 1,
                    target: None,
                    len: children.len(),
                });
            }
            children.insert(index, node.clone());
        }

        node.set_parent(Some(self));
        register_subtree(&self.inner.dispatcher, node);

        tracing::trace!(parent = %self.id(), node = %node.id(), index, "inserted node");
        Ok(())
    }

    /// Relocate the run `[from, from + count)` so it sits before the child
    /// originally at `to`. Identities and parents are untouched.
    pub fn move_children(&self, from: usize, to: usize, count: usize) -> TreeResult<()> {
        let tag = self.as_tag()?;
        let mut children = lock(&tag.children);
        let len = children.len();

        let out_of_range = || TreeError::OutOfRange {
            op: "move",
            index: from,
            count,
            target: Some(to),
            len,
        };

        let end = from
            .checked_add(count)
            .filter(|end| *end <= len)
            .ok_or_else(out_of_range)?;
        if to > len {
            return Err(out_of_range());
        }
        if from == to || count == 0 {
            return Ok(());
        }
        // A run cannot be placed before one of its own members
        if to > from && to < end {
            return Err(out_of_range());
        }

        let dest = if from > to { to } else { to - count };
        let run: Vec<Node> = children.drain(from..end).collect();
        children.splice(dest..dest, run);

        tracing::trace!(parent = %self.id(), from, to, count, "moved children");
        Ok(())
    }

    /// Detach `count` children starting at `index` and stop observing them.
    /// Returns the detached nodes in their former order.
    pub fn remove(&self, index: usize, count: usize) -> TreeResult<Vec<Node>> {
        let tag = self.as_tag()?;

        let removed: Vec<Node> = {
            let mut children = lock(&tag.children);
            let len = children.len();
            let end = index
                .checked_add(count)
                .filter(|end| *end <= len)
                .ok_or(TreeError::OutOfRange {
                    op: "remove",
                    index,
                    count,
                    target: None,
                    len,
                })?;
            children.drain(index..end).collect()
        };

        for node in &removed {
            node.set_parent(None);
            unregister_subtree(&self.inner.dispatcher, node);
        }

        tracing::trace!(parent = %self.id(), index, count, "removed children");
        Ok(removed)
    }
}
