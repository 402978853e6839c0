//! LIFO record of cut links.

use crate::graph::LinkId;

/// Cut links, most recent on top.
///
/// Cuts only push and undo only pops; there is no redo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStack {
    stack: Vec<LinkId>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one cut link.
    pub fn push(&mut self, id: LinkId) {
        self.stack.push(id);
    }

    /// Record links in the order they were removed.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = LinkId>) {
        self.stack.extend(ids);
    }

    /// Take the most recently cut link.
    pub fn pop(&mut self) -> Option<LinkId> {
        self.stack.pop()
    }

    /// The link the next undo would restore.
    pub fn peek(&self) -> Option<LinkId> {
        self.stack.last().copied()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Cut links from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = LinkId> + '_ {
        self.stack.iter().copied()
    }
}
