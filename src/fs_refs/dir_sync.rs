use std::fs;
use std::path::Path;

use crate::canvas::geometry::{SYNC_GRID_START, grid_position};
use crate::data::entities::{CanvasNode, NodeKind};
use crate::data::store::EntityStore;

/// Sync the immediate children of a directory into the store.
///
/// Deliberately non-recursive: one `read_dir` pass bounds the cost
/// regardless of tree depth. The already-known check is scoped to children
/// of this exact parent, and the grid index starts at that count, so
/// repeated syncs append new children instead of overlapping old ones.
///
/// A missing or unreadable path is "nothing to do", not an error.
pub fn sync_directory(store: &mut EntityStore, parent_id: &str) -> Vec<CanvasNode> {
    let parent = Path::new(parent_id);
    if !parent.is_dir() {
        log::debug!("sync skipped, not a directory: {parent_id}");
        return Vec::new();
    }
    let entries = match fs::read_dir(parent) {
        Ok(e) => e,
        Err(err) => {
            log::warn!("sync cannot read {parent_id}: {err}");
            return Vec::new();
        }
    };

    let known: std::collections::HashSet<String> =
        store.children_of(parent_id).into_iter().map(|n| n.id).collect();

    // Sorted listing keeps grid placement deterministic across runs.
    let mut children: Vec<(String, String, bool)> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let id = path.to_string_lossy().into_owned();
        if known.contains(&id) {
            continue;
        }
        let display_name = entry.file_name().to_string_lossy().into_owned();
        children.push((id, display_name, path.is_dir()));
    }
    children.sort_by(|a, b| a.0.cmp(&b.0));

    let mut index = known.len();
    let mut created = Vec::with_capacity(children.len());
    for (id, display_name, is_dir) in children {
        let pos = grid_position(SYNC_GRID_START, index);
        index += 1;
        created.push(CanvasNode {
            id,
            display_name,
            x: pos.x,
            y: pos.y,
            parent: Some(parent_id.to_string()),
            kind: if is_dir { NodeKind::Folder } else { NodeKind::File },
        });
    }
    store.upsert_nodes(created.clone());
    created
}
