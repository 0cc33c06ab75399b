use std::collections::HashMap;

use eframe::egui::Pos2;

use crate::data::entities::{CanvasNode, NodeId};

/// In-memory mirror of node positions, decoupled from the persisted
/// records. Drags write here at pointer-move frequency; the store is only
/// touched once, at gesture end.
///
/// Anti-clobber invariant: a store snapshot seeds ids it has not seen and
/// drops ids that vanished, but never overwrites an entry that is already
/// present. A concurrent store refresh therefore cannot stomp an in-flight
/// drag.
#[derive(Debug, Default)]
pub struct LivePositionCache {
    positions: HashMap<NodeId, Pos2>,
}

impl LivePositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile against a full node snapshot: first-seen wins, vanished
    /// ids are removed, existing entries are preserved untouched.
    pub fn apply_snapshot(&mut self, nodes: &[CanvasNode]) {
        for node in nodes {
            if !self.positions.contains_key(&node.id) {
                self.positions.insert(node.id.clone(), node.pos());
            }
        }
        self.positions.retain(|id, _| nodes.iter().any(|n| &n.id == id));
    }

    pub fn live_update(&mut self, id: &str, pos: Pos2) {
        self.positions.insert(id.to_string(), pos);
    }

    pub fn get(&self, id: &str) -> Option<Pos2> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
