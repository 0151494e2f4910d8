use crate::editor::{self, InsertPosition};
use crate::fixed_rate::{FixedRateOverride, DEFAULT_PERIOD_SEC};
use crate::host::LoopHost;
use crate::identity::NodeId;
use crate::node::{Handler, UpdateNode};
use crate::registry::InsertedSystems;

use log::{debug, info, warn};

/// Owner of everything this crate changes in a host tree.
///
/// Holds the registry of inserted systems and the fixed-rate override. It is owned by
/// the top-level scheduler and passed by reference to whoever edits the tree, so all
/// mutation goes through one place.
pub struct LoopSystems {
    inserted: InsertedSystems,
    rate: FixedRateOverride,
    shutdown_done: bool,
}

impl Default for LoopSystems {
    fn default() -> Self {
        Self::new(FixedRateOverride::new(DEFAULT_PERIOD_SEC))
    }
}

impl LoopSystems {
    #[inline]
    pub fn new(rate: FixedRateOverride) -> Self {
        Self {
            inserted: InsertedSystems::new(),
            rate,
            shutdown_done: false,
        }
    }

    #[inline]
    pub fn rate_override(&self) -> &FixedRateOverride {
        &self.rate
    }

    #[inline]
    pub fn inserted(&self) -> &InsertedSystems {
        &self.inserted
    }

    #[inline]
    pub fn set_update_period(&self, period_sec: f32) {
        self.rate.set_period(period_sec);
    }

    #[inline]
    pub fn install_rate_override<H: LoopHost + ?Sized>(&self, host: &mut H, target: NodeId) -> bool {
        self.rate.install(host, target)
    }

    #[inline]
    pub fn insert_system_before<H: LoopHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: NodeId,
        handler: Handler,
        target: NodeId,
    ) -> bool {
        self.insert_system(host, UpdateNode::with_handler(id, handler), target, InsertPosition::Before)
    }

    #[inline]
    pub fn insert_system_after<H: LoopHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: NodeId,
        handler: Handler,
        target: NodeId,
    ) -> bool {
        self.insert_system(host, UpdateNode::with_handler(id, handler), target, InsertPosition::After)
    }

    fn insert_system<H: LoopHost + ?Sized>(
        &mut self,
        host: &mut H,
        node: UpdateNode,
        target: NodeId,
        position: InsertPosition,
    ) -> bool {
        let id = node.id;
        let mut tree = host.current_tree();
        if !editor::insert(&mut tree, node, target, position) {
            warn!("insert '{id}' {position:?} '{target}': target not found");
            return false;
        }

        self.inserted.record(id);
        host.set_tree(tree);
        debug!("inserted '{id}' {position:?} '{target}'");
        true
    }

    /// Removes the first node with `id` from the host tree.
    pub fn try_remove_system<H: LoopHost + ?Sized>(&mut self, host: &mut H, id: NodeId) -> bool {
        let mut tree = host.current_tree();
        if !editor::remove(&mut tree, id) {
            return false;
        }

        self.inserted.forget(id);
        host.set_tree(tree);
        debug!("removed '{id}'");
        true
    }

    /// Undoes every insertion made through this context. Runs once; later calls return 0.
    pub fn on_shutdown<H: LoopHost + ?Sized>(&mut self, host: &mut H) -> usize {
        if self.shutdown_done {
            return 0;
        }
        self.shutdown_done = true;

        let pending: Vec<NodeId> = self.inserted.drain().collect();
        let mut tree = host.current_tree();
        let mut removed = 0usize;

        for id in pending {
            if editor::remove(&mut tree, id) {
                removed += 1;
            } else {
                debug!("shutdown: '{id}' already gone");
            }
        }

        if removed > 0 {
            host.set_tree(tree);
        }
        info!("shutdown: removed {removed} inserted system(s)");
        removed
    }

    #[inline]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown_done
    }
}
