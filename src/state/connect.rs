use std::collections::BTreeSet;

use crate::data::entities::NodeId;

/// Connection-creation mode: pick a source node, toggle any number of
/// target nodes, then complete to emit one (source, target) pair per
/// selection. Ephemeral, session-scoped, never persisted.
///
/// Every operation is a total function over the state space; anything
/// invalid (toggling the source, toggling while inactive) is a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ConnectMode {
    #[default]
    Inactive,
    Active {
        source: NodeId,
        targets: BTreeSet<NodeId>,
    },
}

impl ConnectMode {
    /// Enter the mode with an empty target set. Not reentrant: starting
    /// while already active resets to the new source.
    pub fn start(&mut self, source: &str) {
        *self = ConnectMode::Active { source: source.to_string(), targets: BTreeSet::new() };
    }

    /// Flip membership of `id` in the target set. The source itself can
    /// never be a target.
    pub fn toggle_target(&mut self, id: &str) {
        if let ConnectMode::Active { source, targets } = self {
            if id == source {
                return;
            }
            if !targets.remove(id) {
                targets.insert(id.to_string());
            }
        }
    }

    /// Exit the mode, returning one (source, target) pair per selected
    /// target. An empty selection returns no pairs but still exits.
    pub fn complete(&mut self) -> Vec<(NodeId, NodeId)> {
        match std::mem::take(self) {
            ConnectMode::Inactive => Vec::new(),
            ConnectMode::Active { source, targets } => {
                targets.into_iter().map(|t| (source.clone(), t)).collect()
            }
        }
    }

    /// Exit the mode, discarding the selection.
    pub fn cancel(&mut self) {
        *self = ConnectMode::Inactive;
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ConnectMode::Active { .. })
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            ConnectMode::Active { source, .. } => Some(source.as_str()),
            ConnectMode::Inactive => None,
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        match self {
            ConnectMode::Active { targets, .. } => targets.contains(id),
            ConnectMode::Inactive => false,
        }
    }

    pub fn selection_len(&self) -> usize {
        match self {
            ConnectMode::Active { targets, .. } => targets.len(),
            ConnectMode::Inactive => 0,
        }
    }
}
