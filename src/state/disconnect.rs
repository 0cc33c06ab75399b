use std::collections::BTreeSet;

use crate::data::entities::NodeId;

/// Disconnect mode: pick a source node, mark any of its one-hop neighbors
/// for removal, then complete to emit one (source, marked) pair per mark.
/// The neighbor set is computed once at start; toggling anything outside it
/// is a no-op. Ephemeral and never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DisconnectMode {
    #[default]
    Inactive,
    Active {
        source: NodeId,
        neighbors: BTreeSet<NodeId>,
        marked: BTreeSet<NodeId>,
    },
}

impl DisconnectMode {
    /// Enter the mode with the precomputed one-hop neighbor set and nothing
    /// marked. Starting while active resets to the new source.
    pub fn start(&mut self, source: &str, neighbors: BTreeSet<NodeId>) {
        *self = DisconnectMode::Active {
            source: source.to_string(),
            neighbors,
            marked: BTreeSet::new(),
        };
    }

    /// Flip the mark on `id`; only effective for ids in the neighbor set.
    pub fn toggle(&mut self, id: &str) {
        if let DisconnectMode::Active { neighbors, marked, .. } = self {
            if !neighbors.contains(id) {
                return;
            }
            if !marked.remove(id) {
                marked.insert(id.to_string());
            }
        }
    }

    /// Exit the mode, returning one (source, marked) pair per marked id.
    pub fn complete(&mut self) -> Vec<(NodeId, NodeId)> {
        match std::mem::take(self) {
            DisconnectMode::Inactive => Vec::new(),
            DisconnectMode::Active { source, marked, .. } => {
                marked.into_iter().map(|m| (source.clone(), m)).collect()
            }
        }
    }

    /// Exit the mode, discarding the marks.
    pub fn cancel(&mut self) {
        *self = DisconnectMode::Inactive;
    }

    pub fn is_active(&self) -> bool {
        matches!(self, DisconnectMode::Active { .. })
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            DisconnectMode::Active { source, .. } => Some(source.as_str()),
            DisconnectMode::Inactive => None,
        }
    }

    pub fn is_neighbor(&self, id: &str) -> bool {
        match self {
            DisconnectMode::Active { neighbors, .. } => neighbors.contains(id),
            DisconnectMode::Inactive => false,
        }
    }

    pub fn is_marked(&self, id: &str) -> bool {
        match self {
            DisconnectMode::Active { marked, .. } => marked.contains(id),
            DisconnectMode::Inactive => false,
        }
    }

    /// Whether the presentation layer should de-emphasize `id` while the
    /// mode is active: everything except the source and its neighbors.
    pub fn should_dim(&self, id: &str) -> bool {
        match self {
            DisconnectMode::Active { source, neighbors, .. } => {
                id != source && !neighbors.contains(id)
            }
            DisconnectMode::Inactive => false,
        }
    }
}
