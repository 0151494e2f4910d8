use crate::identity::NodeId;
use crate::node::UpdateNode;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FramePhase {
    BeginFrame,
    Input,

    FixedUpdate,
    Update,
    LateUpdate,

    Extract,
    Prepare,
    Render,
    Present,

    EndFrame,
}

pub const ROOT: NodeId = NodeId::new("PlayerLoop");

pub const SCRIPT_RUN_FIXED_UPDATE: NodeId = NodeId::new("FixedUpdate.ScriptRunFixedUpdate");
pub const SCRIPT_RUN_UPDATE: NodeId = NodeId::new("Update.ScriptRunUpdate");
pub const SCRIPT_RUN_LATE_UPDATE: NodeId = NodeId::new("LateUpdate.ScriptRunLateUpdate");

impl FramePhase {
    pub const ALL: [FramePhase; 10] = [
        FramePhase::BeginFrame,
        FramePhase::Input,
        FramePhase::FixedUpdate,
        FramePhase::Update,
        FramePhase::LateUpdate,
        FramePhase::Extract,
        FramePhase::Prepare,
        FramePhase::Render,
        FramePhase::Present,
        FramePhase::EndFrame,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FramePhase::BeginFrame => "BeginFrame",
            FramePhase::Input => "Input",
            FramePhase::FixedUpdate => "FixedUpdate",
            FramePhase::Update => "Update",
            FramePhase::LateUpdate => "LateUpdate",
            FramePhase::Extract => "Extract",
            FramePhase::Prepare => "Prepare",
            FramePhase::Render => "Render",
            FramePhase::Present => "Present",
            FramePhase::EndFrame => "EndFrame",
        }
    }

    #[inline]
    pub const fn id(self) -> NodeId {
        match self {
            FramePhase::BeginFrame => NodeId::new("BeginFrame"),
            FramePhase::Input => NodeId::new("Input"),
            FramePhase::FixedUpdate => NodeId::new("FixedUpdate"),
            FramePhase::Update => NodeId::new("Update"),
            FramePhase::LateUpdate => NodeId::new("LateUpdate"),
            FramePhase::Extract => NodeId::new("Extract"),
            FramePhase::Prepare => NodeId::new("Prepare"),
            FramePhase::Render => NodeId::new("Render"),
            FramePhase::Present => NodeId::new("Present"),
            FramePhase::EndFrame => NodeId::new("EndFrame"),
        }
    }

    /// Script-runner leaf living under this phase, if the phase has one.
    pub fn script_run(self) -> Option<NodeId> {
        match self {
            FramePhase::FixedUpdate => Some(SCRIPT_RUN_FIXED_UPDATE),
            FramePhase::Update => Some(SCRIPT_RUN_UPDATE),
            FramePhase::LateUpdate => Some(SCRIPT_RUN_LATE_UPDATE),
            _ => None,
        }
    }
}

/// Default host tree: one grouping node per phase, script runners as leaves.
///
/// No node carries a handler; hosts attach theirs with `editor::replace`.
pub fn default_tree() -> UpdateNode {
    let phases = FramePhase::ALL
        .iter()
        .map(|&phase| {
            let mut node = UpdateNode::new(phase.id());
            if let Some(leaf) = phase.script_run() {
                node.push_child(UpdateNode::new(leaf));
            }
            node
        })
        .collect();

    UpdateNode::new(ROOT).with_children(phases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor;

    #[test]
    fn default_tree_orders_phases() {
        let tree = default_tree();
        let expected: Vec<NodeId> = FramePhase::ALL.iter().map(|p| p.id()).collect();
        assert_eq!(tree.id, ROOT);
        assert_eq!(tree.child_ids(), expected);
    }

    #[test]
    fn script_runners_sit_under_their_phase() {
        let tree = default_tree();
        let fixed = editor::find(&tree, FramePhase::FixedUpdate.id()).unwrap();
        assert_eq!(fixed.child_ids(), vec![SCRIPT_RUN_FIXED_UPDATE]);
        assert_eq!(
            editor::find_by_name(&tree, "Update.ScriptRunUpdate"),
            Some(SCRIPT_RUN_UPDATE)
        );
        assert_eq!(tree.node_count(), 1 + FramePhase::ALL.len() + 3);
    }

    #[test]
    fn phase_ids_match_names() {
        for phase in FramePhase::ALL {
            assert_eq!(phase.id().as_str(), phase.as_str());
        }
    }
}
