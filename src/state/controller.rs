use std::sync::mpsc::Receiver;

use anyhow::bail;
use eframe::egui::Pos2;

use crate::canvas::geometry::batch_grid_position;
use crate::canvas::transform::CanvasTransform;
use crate::data::entities::{CanvasNode, Connection, NodeKind};
use crate::data::store::EntityStore;
use crate::fs_refs::dir_sync;
use crate::fs_refs::resolver::ResolvedRef;

use super::connect::ConnectMode;
use super::disconnect::DisconnectMode;
use super::live_cache::LivePositionCache;

/// Orchestration layer: owns the entity store, the live position cache,
/// the two gesture state machines and the canvas transform, and keeps them
/// consistent.
///
/// Store snapshots arrive over the store's subscription channels and are
/// drained once per frame by `process_store_events`, which reconciles the
/// live cache (seed new ids, drop stale ids, never overwrite — so an
/// in-flight drag survives a concurrent refresh).
pub struct CanvasController {
    store: EntityStore,
    cache: LivePositionCache,
    pub connect: ConnectMode,
    pub disconnect: DisconnectMode,
    pub transform: CanvasTransform,
    nodes_rx: Receiver<Vec<CanvasNode>>,
    conns_rx: Receiver<Vec<Connection>>,
    // Latest snapshots, kept for render-layer consumption.
    nodes_view: Vec<CanvasNode>,
    conns_view: Vec<Connection>,
}

impl CanvasController {
    pub fn new(mut store: EntityStore) -> Self {
        let nodes_rx = store.subscribe_nodes();
        let conns_rx = store.subscribe_connections();
        let mut c = Self {
            store,
            cache: LivePositionCache::new(),
            connect: ConnectMode::Inactive,
            disconnect: DisconnectMode::Inactive,
            transform: CanvasTransform::default(),
            nodes_rx,
            conns_rx,
            nodes_view: Vec::new(),
            conns_view: Vec::new(),
        };
        c.process_store_events();
        c
    }

    pub fn with_transform(store: EntityStore, transform: CanvasTransform) -> Self {
        let mut c = Self::new(store);
        c.transform = transform;
        c
    }

    /// Drain pending store snapshots and reconcile the live cache. Called
    /// at the top of every frame, before any gesture handling.
    pub fn process_store_events(&mut self) {
        let mut latest_nodes = None;
        for snap in self.nodes_rx.try_iter() {
            latest_nodes = Some(snap);
        }
        if let Some(snap) = latest_nodes {
            self.cache.apply_snapshot(&snap);
            self.nodes_view = snap;
        }
        let mut latest_conns = None;
        for snap in self.conns_rx.try_iter() {
            latest_conns = Some(snap);
        }
        if let Some(snap) = latest_conns {
            self.conns_view = snap;
        }
    }

    // ---- render-facing reads ----

    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes_view
    }

    pub fn connections(&self) -> &[Connection] {
        &self.conns_view
    }

    /// Currently-rendered position: the live cache ahead of the record.
    pub fn live_position(&self, id: &str) -> Option<Pos2> {
        self.cache.get(id)
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    // ---- node lifecycle ----

    /// Place a single resolved reference at the drop point. Re-adding an
    /// already-known id is a no-op, keeping its existing position.
    pub fn add_reference(&mut self, r: ResolvedRef, drop_point: Pos2) -> bool {
        if self.store.get_node(&r.id).is_some() {
            return false;
        }
        self.store.upsert_node(Self::node_from_ref(r, drop_point));
        self.process_store_events();
        true
    }

    /// Place a batch of resolved references on a grid centered on `center`.
    /// Known ids are skipped; returns how many nodes were created.
    pub fn add_references(&mut self, refs: Vec<ResolvedRef>, center: Pos2) -> usize {
        let fresh: Vec<ResolvedRef> = refs
            .into_iter()
            .filter(|r| self.store.get_node(&r.id).is_none())
            .collect();
        let count = fresh.len();
        let batch: Vec<CanvasNode> = fresh
            .into_iter()
            .enumerate()
            .map(|(i, r)| Self::node_from_ref(r, batch_grid_position(center, i, count)))
            .collect();
        self.store.upsert_nodes(batch);
        self.process_store_events();
        count
    }

    /// Delete a node: connections touching it go first, then the record.
    /// The cache entry falls out with the next snapshot.
    pub fn delete_node(&mut self, id: &str) -> bool {
        let removed = self.store.delete_node(id);
        self.process_store_events();
        removed
    }

    /// Sync the immediate children of a folder node into the store.
    pub fn sync_directory(&mut self, parent_id: &str) -> Vec<CanvasNode> {
        let created = dir_sync::sync_directory(&mut self.store, parent_id);
        self.process_store_events();
        created
    }

    // ---- drag gesture ----

    /// Cache-only position write; safe at pointer-move frequency.
    pub fn live_update(&mut self, id: &str, pos: Pos2) {
        self.cache.live_update(id, pos);
    }

    /// Write the live position through to the store; called exactly once
    /// per drag gesture, at gesture end. On failure the live value stays
    /// put so the user can retry.
    pub fn commit(&mut self, id: &str) -> anyhow::Result<()> {
        let Some(pos) = self.cache.get(id) else {
            bail!("no live position for {id}");
        };
        if !self.store.set_node_position(id, pos.x, pos.y) {
            bail!("position write failed, {id} is not in the store");
        }
        self.process_store_events();
        Ok(())
    }

    // ---- connect mode ----

    pub fn begin_connect(&mut self, source: &str) {
        self.disconnect.cancel();
        self.connect.start(source);
    }

    pub fn toggle_connect_target(&mut self, id: &str) {
        self.connect.toggle_target(id);
    }

    /// Complete the gesture: one store insert per selected target. The
    /// store's undirected duplicate guard filters silently.
    pub fn complete_connect(&mut self) -> usize {
        let pairs = self.connect.complete();
        let mut inserted = 0;
        for (source, target) in pairs {
            if self.store.insert_connection(&source, &target).is_some() {
                inserted += 1;
            }
        }
        self.process_store_events();
        inserted
    }

    pub fn cancel_connect(&mut self) {
        self.connect.cancel();
    }

    // ---- disconnect mode ----

    pub fn begin_disconnect(&mut self, source: &str) {
        self.connect.cancel();
        let neighbors = self.store.neighbors_of(source);
        self.disconnect.start(source, neighbors);
    }

    pub fn toggle_disconnect(&mut self, id: &str) {
        self.disconnect.toggle(id);
    }

    /// Complete the gesture: delete each marked pair in either direction.
    pub fn complete_disconnect(&mut self) -> usize {
        let pairs = self.disconnect.complete();
        let mut removed = 0;
        for (source, marked) in pairs {
            removed += self.store.delete_connection_between(&source, &marked);
        }
        self.process_store_events();
        removed
    }

    pub fn cancel_disconnect(&mut self) {
        self.disconnect.cancel();
    }

    fn node_from_ref(r: ResolvedRef, pos: Pos2) -> CanvasNode {
        CanvasNode {
            id: r.id,
            display_name: r.display_name,
            x: pos.x,
            y: pos.y,
            parent: None,
            kind: if r.is_folder { NodeKind::Folder } else { NodeKind::File },
        }
    }
}
