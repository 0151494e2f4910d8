use crate::identity::NodeId;
use crate::time::Time;

use std::fmt;
use std::sync::Arc;

/// Callback attached to an update node. Invoked once per traversal.
pub type Handler = Arc<dyn Fn(&Time) + Send + Sync>;

/// Wraps a closure into a shareable [`Handler`].
#[inline]
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Time) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A node of the update tree.
///
/// Children are owned exclusively by the parent; their order is the execution order.
/// Cloning is structural: the tree shape is copied, handlers are shared.
#[derive(Clone)]
pub struct UpdateNode {
    pub id: NodeId,
    pub handler: Option<Handler>,
    pub children: Vec<UpdateNode>,
}

impl UpdateNode {
    /// Node without a handler (a pure grouping node).
    #[inline]
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            handler: None,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn with_handler(id: NodeId, handler: Handler) -> Self {
        Self {
            id,
            handler: Some(handler),
            children: Vec::new(),
        }
    }

    /// Shorthand for a handler node built from a closure.
    #[inline]
    pub fn leaf<F>(id: NodeId, f: F) -> Self
    where
        F: Fn(&Time) + Send + Sync + 'static,
    {
        Self::with_handler(id, handler(f))
    }

    #[inline]
    pub fn with_children(mut self, children: Vec<UpdateNode>) -> Self {
        self.children = children;
        self
    }

    #[inline]
    pub fn push_child(&mut self, child: UpdateNode) {
        self.children.push(child);
    }

    /// Runs this node's own handler, if any. Children are not visited.
    #[inline]
    pub fn invoke(&self, time: &Time) {
        if let Some(h) = self.handler.as_ref() {
            h(time);
        }
    }

    #[inline]
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn child_ids(&self) -> Vec<NodeId> {
        self.children.iter().map(|c| c.id).collect()
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(UpdateNode::node_count).sum::<usize>()
    }
}

impl PartialEq for UpdateNode {
    fn eq(&self, other: &Self) -> bool {
        let same_handler = match (&self.handler, &other.handler) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.id == other.id && same_handler && self.children == other.children
    }
}

impl fmt::Debug for UpdateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateNode")
            .field("id", &self.id)
            .field("handler", &self.handler.as_ref().map(|_| "<fn>"))
            .field("children", &self.children)
            .finish()
    }
}
