use serde::{Deserialize, Serialize};

// Stable node key: the canonicalized path string of the underlying
// file/folder reference. Unique and reusable across sessions.
pub type NodeId = String;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Folder,
    File,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: NodeId,
    pub display_name: String,
    // Position in canvas units. Mutable only through the store's
    // position-write path; drags run against the live cache until committed.
    pub x: f32,
    pub y: f32,
    // None for root-level nodes placed manually; Some(parent id) only for
    // children created by directory sync.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl CanvasNode {
    pub fn pos(&self) -> egui::Pos2 {
        egui::pos2(self.x, self.y)
    }
}

/// A user-drawn edge between two nodes. Stored as an ordered pair but
/// treated as undirected everywhere: existence checks, deletes and the
/// one-hop neighbor query all match either direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: i64,
    pub source: NodeId,
    pub target: NodeId,
}

impl Connection {
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }

    pub fn links(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}
