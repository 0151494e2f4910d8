use crate::identity::NodeId;

/// Identities of the nodes this process spliced into the host tree.
///
/// Only used to undo those insertions on shutdown.
#[derive(Debug, Default)]
pub struct InsertedSystems {
    entries: Vec<NodeId>,
}

impl InsertedSystems {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, id: NodeId) {
        self.entries.push(id);
    }

    /// Drops one entry for `id`. Returns whether it was tracked.
    pub fn forget(&mut self, id: NodeId) -> bool {
        match self.entries.iter().position(|e| *e == id) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.contains(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empties the registry, yielding entries in insertion order.
    #[inline]
    pub fn drain(&mut self) -> std::vec::Drain<'_, NodeId> {
        self.entries.drain(..)
    }
}
