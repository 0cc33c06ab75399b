use std::collections::{BTreeSet, HashMap};
use std::sync::mpsc::{Receiver, Sender, channel};

use super::entities::{CanvasNode, Connection, NodeId};

enum NodeFilter {
    All,
    ByParent(NodeId),
    Roots,
}

impl NodeFilter {
    fn matches(&self, node: &CanvasNode) -> bool {
        match self {
            NodeFilter::All => true,
            NodeFilter::ByParent(p) => node.parent.as_deref() == Some(p.as_str()),
            NodeFilter::Roots => node.parent.is_none(),
        }
    }
}

enum ConnFilter {
    All,
    Touching(NodeId),
}

impl ConnFilter {
    fn matches(&self, conn: &Connection) -> bool {
        match self {
            ConnFilter::All => true,
            ConnFilter::Touching(id) => conn.touches(id),
        }
    }
}

struct NodeSub {
    filter: NodeFilter,
    tx: Sender<Vec<CanvasNode>>,
}

struct ConnSub {
    filter: ConnFilter,
    tx: Sender<Vec<Connection>>,
}

/// In-memory entity store for node and connection records.
///
/// All mutations are atomic with respect to a single logical caller, and
/// every mutation republishes the full current snapshot to each live
/// subscription (consumers diff locally). Durability is layered on top by
/// the persist module, which serializes the whole store.
pub struct EntityStore {
    nodes: HashMap<NodeId, CanvasNode>,
    connections: HashMap<i64, Connection>,
    next_connection_id: i64,
    node_subs: Vec<NodeSub>,
    conn_subs: Vec<ConnSub>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            connections: HashMap::new(),
            next_connection_id: 1,
            node_subs: Vec::new(),
            conn_subs: Vec::new(),
        }
    }

    /// Rebuild a store from persisted records. The connection id counter
    /// resumes past the highest persisted id.
    pub fn from_records(nodes: Vec<CanvasNode>, connections: Vec<Connection>) -> Self {
        let mut s = Self::new();
        s.next_connection_id = connections.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        s.nodes = nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        s.connections = connections.into_iter().map(|c| (c.id, c)).collect();
        s
    }

    // ---- node operations ----

    pub fn upsert_node(&mut self, node: CanvasNode) {
        self.nodes.insert(node.id.clone(), node);
        self.publish_nodes();
    }

    pub fn upsert_nodes(&mut self, batch: Vec<CanvasNode>) {
        if batch.is_empty() {
            return;
        }
        for node in batch {
            self.nodes.insert(node.id.clone(), node);
        }
        self.publish_nodes();
    }

    /// Persisted-position write path: the commit half of a drag gesture.
    pub fn set_node_position(&mut self, id: &str, x: f32, y: f32) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.x = x;
                node.y = y;
                self.publish_nodes();
                true
            }
            None => false,
        }
    }

    /// Remove a node, cascading to every connection touching it first.
    pub fn delete_node(&mut self, id: &str) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        self.delete_connections_touching(id);
        self.nodes.remove(id);
        self.publish_nodes();
        true
    }

    pub fn delete_all(&mut self) {
        self.nodes.clear();
        self.connections.clear();
        self.publish_nodes();
        self.publish_connections();
    }

    pub fn get_node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes_snapshot(&self) -> Vec<CanvasNode> {
        Self::sorted_nodes(self.nodes.values().cloned())
    }

    pub fn root_nodes(&self) -> Vec<CanvasNode> {
        Self::sorted_nodes(self.nodes.values().filter(|n| n.parent.is_none()).cloned())
    }

    pub fn children_of(&self, parent: &str) -> Vec<CanvasNode> {
        Self::sorted_nodes(
            self.nodes
                .values()
                .filter(|n| n.parent.as_deref() == Some(parent))
                .cloned(),
        )
    }

    // ---- connection operations ----

    /// Insert a connection unless it would self-loop or duplicate an edge
    /// that already links the pair in either direction. Returns the new id.
    pub fn insert_connection(&mut self, source: &str, target: &str) -> Option<i64> {
        if source == target || self.linked(source, target) {
            return None;
        }
        let id = self.next_connection_id;
        self.next_connection_id += 1;
        self.connections.insert(
            id,
            Connection { id, source: source.to_string(), target: target.to_string() },
        );
        self.publish_connections();
        Some(id)
    }

    /// Whether any connection links `a` and `b`, in either direction.
    pub fn linked(&self, a: &str, b: &str) -> bool {
        self.connections.values().any(|c| c.links(a, b))
    }

    pub fn delete_connection(&mut self, id: i64) -> bool {
        let removed = self.connections.remove(&id).is_some();
        if removed {
            self.publish_connections();
        }
        removed
    }

    pub fn delete_connections_touching(&mut self, node_id: &str) -> usize {
        let before = self.connections.len();
        self.connections.retain(|_, c| !c.touches(node_id));
        let removed = before - self.connections.len();
        if removed > 0 {
            self.publish_connections();
        }
        removed
    }

    pub fn delete_connection_between(&mut self, a: &str, b: &str) -> usize {
        let before = self.connections.len();
        self.connections.retain(|_, c| !c.links(a, b));
        let removed = before - self.connections.len();
        if removed > 0 {
            self.publish_connections();
        }
        removed
    }

    pub fn delete_all_connections(&mut self) {
        if !self.connections.is_empty() {
            self.connections.clear();
            self.publish_connections();
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn connections_snapshot(&self) -> Vec<Connection> {
        Self::sorted_connections(self.connections.values().cloned())
    }

    pub fn connections_touching(&self, node_id: &str) -> Vec<Connection> {
        Self::sorted_connections(
            self.connections.values().filter(|c| c.touches(node_id)).cloned(),
        )
    }

    /// All node ids reachable via one hop from `id`: the union of outgoing
    /// targets and incoming sources, deduplicated.
    pub fn neighbors_of(&self, id: &str) -> BTreeSet<NodeId> {
        let mut out = BTreeSet::new();
        for c in self.connections.values() {
            if c.source == id {
                out.insert(c.target.clone());
            } else if c.target == id {
                out.insert(c.source.clone());
            }
        }
        out
    }

    // ---- subscriptions ----
    //
    // Snapshot-on-change over std mpsc channels: every subscription receives
    // the current snapshot immediately, then the full filtered snapshot on
    // each subsequent change. Receivers that have been dropped are pruned on
    // the next publish.

    pub fn subscribe_nodes(&mut self) -> Receiver<Vec<CanvasNode>> {
        self.subscribe_nodes_filtered(NodeFilter::All)
    }

    pub fn subscribe_children(&mut self, parent: &str) -> Receiver<Vec<CanvasNode>> {
        self.subscribe_nodes_filtered(NodeFilter::ByParent(parent.to_string()))
    }

    pub fn subscribe_roots(&mut self) -> Receiver<Vec<CanvasNode>> {
        self.subscribe_nodes_filtered(NodeFilter::Roots)
    }

    pub fn subscribe_connections(&mut self) -> Receiver<Vec<Connection>> {
        self.subscribe_connections_filtered(ConnFilter::All)
    }

    pub fn subscribe_connections_touching(&mut self, node_id: &str) -> Receiver<Vec<Connection>> {
        self.subscribe_connections_filtered(ConnFilter::Touching(node_id.to_string()))
    }

    fn subscribe_nodes_filtered(&mut self, filter: NodeFilter) -> Receiver<Vec<CanvasNode>> {
        let (tx, rx) = channel();
        let snapshot =
            Self::sorted_nodes(self.nodes.values().filter(|n| filter.matches(n)).cloned());
        let _ = tx.send(snapshot);
        self.node_subs.push(NodeSub { filter, tx });
        rx
    }

    fn subscribe_connections_filtered(&mut self, filter: ConnFilter) -> Receiver<Vec<Connection>> {
        let (tx, rx) = channel();
        let snapshot =
            Self::sorted_connections(self.connections.values().filter(|c| filter.matches(c)).cloned());
        let _ = tx.send(snapshot);
        self.conn_subs.push(ConnSub { filter, tx });
        rx
    }

    fn publish_nodes(&mut self) {
        let nodes = &self.nodes;
        self.node_subs.retain(|sub| {
            let snapshot =
                Self::sorted_nodes(nodes.values().filter(|n| sub.filter.matches(n)).cloned());
            sub.tx.send(snapshot).is_ok()
        });
    }

    fn publish_connections(&mut self) {
        let connections = &self.connections;
        self.conn_subs.retain(|sub| {
            let snapshot = Self::sorted_connections(
                connections.values().filter(|c| sub.filter.matches(c)).cloned(),
            );
            sub.tx.send(snapshot).is_ok()
        });
    }

    // Snapshots are sorted so consumers and tests see a stable order.
    fn sorted_nodes(iter: impl Iterator<Item = CanvasNode>) -> Vec<CanvasNode> {
        let mut v: Vec<CanvasNode> = iter.collect();
        v.sort_by(|a, b| a.id.cmp(&b.id));
        v
    }

    fn sorted_connections(iter: impl Iterator<Item = Connection>) -> Vec<Connection> {
        let mut v: Vec<Connection> = iter.collect();
        v.sort_by_key(|c| c.id);
        v
    }
}
