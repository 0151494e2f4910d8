use std::fmt;

/// Identity of an update node.
///
/// Used for lookup and equality only, never for dispatch.
/// Hosts declare their catalog as `const` values, callers usually derive one from a marker type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(&'static str);

impl NodeId {
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Convenience identity keyed by the marker type's name.
    ///
    /// Built on `std::any::type_name`, whose output is neither guaranteed unique nor stable
    /// across compiler versions. Good for ids that live only within one process run; anything
    /// persisted, configured by name or shared across binaries should use a `const`
    /// [`NodeId::new`].
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(std::any::type_name::<T>())
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId").field(&self.0).finish()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MarkerA;
    struct MarkerB;

    #[test]
    fn marker_types_give_distinct_ids() {
        assert_eq!(NodeId::of::<MarkerA>(), NodeId::of::<MarkerA>());
        assert_ne!(NodeId::of::<MarkerA>(), NodeId::of::<MarkerB>());
        assert!(NodeId::of::<MarkerA>().as_str().ends_with("MarkerA"));
    }

    #[test]
    fn const_ids_compare_by_name() {
        const UPDATE: NodeId = NodeId::new("Update");
        assert_eq!(UPDATE, NodeId::new("Update"));
        assert_eq!(UPDATE.to_string(), "Update");
    }
}
