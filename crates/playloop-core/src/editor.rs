//! Tree surgery over [`UpdateNode`] trees, keyed by [`NodeId`].
//!
//! All searches are pre-order depth-first and stop at the first match.
//! Insert and remove only consider descendants of the given root; replace and find
//! consider the root as well.
//!
//! "Not found" is a normal outcome reported through the return value; the tree is left
//! untouched in that case.

use crate::identity::NodeId;
use crate::node::{Handler, UpdateNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Before,
    After,
}

/// What `replace` took out of the tree.
pub struct Displaced {
    pub id: NodeId,
    pub handler: Option<Handler>,
}

/// Splices `node` next to the first descendant of `root` whose id is `target`.
pub fn insert(
    root: &mut UpdateNode,
    node: UpdateNode,
    target: NodeId,
    position: InsertPosition,
) -> bool {
    let Some((parent, index)) = locate_mut(root, target) else {
        return false;
    };

    let at = match position {
        InsertPosition::Before => index,
        InsertPosition::After => index + 1,
    };
    parent.children.insert(at, node);
    true
}

#[inline]
pub fn insert_before(root: &mut UpdateNode, node: UpdateNode, target: NodeId) -> bool {
    insert(root, node, target, InsertPosition::Before)
}

#[inline]
pub fn insert_after(root: &mut UpdateNode, node: UpdateNode, target: NodeId) -> bool {
    insert(root, node, target, InsertPosition::After)
}

/// Removes the first descendant of `root` with the given id.
pub fn remove(root: &mut UpdateNode, id: NodeId) -> bool {
    let Some((parent, index)) = locate_mut(root, id) else {
        return false;
    };
    parent.children.remove(index);
    true
}

/// Puts `replacement` in place of the first node (root included) with the given id.
///
/// The displaced node's children are kept: they are appended after the replacement's
/// own children, so replacing a non-leaf never drops a subtree.
pub fn replace(root: &mut UpdateNode, id: NodeId, replacement: UpdateNode) -> Option<Displaced> {
    let slot = find_mut(root, id)?;
    let old = std::mem::replace(slot, replacement);
    slot.children.extend(old.children);

    Some(Displaced {
        id: old.id,
        handler: old.handler,
    })
}

/// First node (root included) with the given id.
pub fn find(root: &UpdateNode, id: NodeId) -> Option<&UpdateNode> {
    if root.id == id {
        return Some(root);
    }
    root.children.iter().find_map(|c| find(c, id))
}

#[inline]
pub fn contains(root: &UpdateNode, id: NodeId) -> bool {
    find(root, id).is_some()
}

/// Resolves a textual identity (e.g. from configuration) against the tree.
pub fn find_by_name(root: &UpdateNode, name: &str) -> Option<NodeId> {
    if root.id.as_str() == name {
        return Some(root.id);
    }
    root.children.iter().find_map(|c| find_by_name(c, name))
}

/* ============================
   Internals
   ============================ */

/// Index path from `node` down to the first matching descendant.
fn locate_path(node: &UpdateNode, target: NodeId, path: &mut Vec<usize>) -> bool {
    for (i, child) in node.children.iter().enumerate() {
        path.push(i);
        if child.id == target || locate_path(child, target, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Parent of the first matching descendant, plus the match's index in it.
fn locate_mut(root: &mut UpdateNode, target: NodeId) -> Option<(&mut UpdateNode, usize)> {
    let mut path = Vec::new();
    if !locate_path(root, target, &mut path) {
        return None;
    }

    let (&index, parents) = path.split_last()?;
    let mut parent = root;
    for &i in parents {
        parent = &mut parent.children[i];
    }
    Some((parent, index))
}

fn find_mut(root: &mut UpdateNode, id: NodeId) -> Option<&mut UpdateNode> {
    if root.id == id {
        return Some(root);
    }

    let mut path = Vec::new();
    if !locate_path(root, id, &mut path) {
        return None;
    }

    let mut node = root;
    for i in path {
        node = &mut node.children[i];
    }
    Some(node)
}
