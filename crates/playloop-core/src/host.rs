use crate::node::UpdateNode;

/// Source and sink of the active update tree.
///
/// Editing is copy-on-write at the top level: take `current_tree()`, mutate the copy,
/// hand it back with `set_tree()`. Nothing keeps a live alias into the running tree.
pub trait LoopHost {
    fn current_tree(&self) -> UpdateNode;
    fn set_tree(&mut self, tree: UpdateNode);
}

/// Minimal host slot holding one active tree.
#[derive(Debug, Clone)]
pub struct ActiveTree {
    tree: UpdateNode,
    installs: u64,
}

impl ActiveTree {
    #[inline]
    pub fn new(tree: UpdateNode) -> Self {
        Self { tree, installs: 0 }
    }

    /// Borrow of the running tree, for traversal.
    #[inline]
    pub fn get(&self) -> &UpdateNode {
        &self.tree
    }

    /// How many times a tree has been installed since creation.
    #[inline]
    pub fn installs(&self) -> u64 {
        self.installs
    }
}

impl LoopHost for ActiveTree {
    #[inline]
    fn current_tree(&self) -> UpdateNode {
        self.tree.clone()
    }

    #[inline]
    fn set_tree(&mut self, tree: UpdateNode) {
        self.tree = tree;
        self.installs += 1;
    }
}
