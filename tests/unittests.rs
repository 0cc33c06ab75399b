use egui::{Pos2, pos2, vec2};

use filescape::canvas::geometry::{
    self, GRID_CELL, GRID_GAP, SYNC_GRID_START, batch_grid_position, grid_position,
};
use filescape::canvas::transform::{CanvasTransform, MAX_SCALE, MIN_SCALE};
use filescape::data::entities::{CanvasNode, NodeKind};
use filescape::data::store::EntityStore;
use filescape::fs_refs::dir_sync::sync_directory;
use filescape::fs_refs::resolver::{FsResolver, ReferenceResolver, ResolvedRef};
use filescape::persistence::export;
use filescape::persistence::persist::{self, AppStateFile};
use filescape::persistence::settings::AppSettings;
use filescape::state::connect::ConnectMode;
use filescape::state::controller::CanvasController;
use filescape::state::disconnect::DisconnectMode;
use filescape::state::live_cache::LivePositionCache;

fn node(id: &str, x: f32, y: f32) -> CanvasNode {
    CanvasNode {
        id: id.to_string(),
        display_name: id.to_string(),
        x,
        y,
        parent: None,
        kind: NodeKind::File,
    }
}

fn file_ref(id: &str) -> ResolvedRef {
    ResolvedRef { id: id.to_string(), display_name: id.to_string(), is_folder: false }
}

fn approx(a: Pos2, b: Pos2) -> bool {
    (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
}

// ---- coordinate transform ----

#[test]
fn transform_round_trip_is_identity() {
    let cases = [
        CanvasTransform::default(),
        CanvasTransform::new(0.2, vec2(15.0, -40.0)),
        CanvasTransform::new(2.5, vec2(-300.5, 912.25)),
        CanvasTransform::new(4.0, vec2(0.0, 0.001)),
    ];
    let points = [pos2(0.0, 0.0), pos2(-52.5, 17.0), pos2(1024.0, -768.0)];
    for t in cases {
        for p in points {
            assert!(approx(t.screen_to_canvas(t.canvas_to_screen(p)), p));
            assert!(approx(t.canvas_to_screen(t.screen_to_canvas(p)), p));
        }
    }
}

#[test]
fn zoom_keeps_focal_point_stationary() {
    let mut t = CanvasTransform::new(1.0, vec2(30.0, -12.0));
    let focal = pos2(200.0, 140.0);
    let anchored = t.screen_to_canvas(focal);
    for factor in [1.3, 0.5, 2.0, 0.8] {
        t.zoom(factor, focal);
        assert!(approx(t.canvas_to_screen(anchored), focal));
    }
}

#[test]
fn zoom_scale_is_clamped() {
    let mut t = CanvasTransform::default();
    for _ in 0..50 {
        t.zoom(3.0, pos2(10.0, 10.0));
    }
    assert_eq!(t.scale, MAX_SCALE);
    for _ in 0..100 {
        t.zoom(0.1, pos2(10.0, 10.0));
    }
    assert_eq!(t.scale, MIN_SCALE);
}

#[test]
fn zoom_at_clamp_bound_leaves_offset_alone() {
    let mut t = CanvasTransform::new(4.0, vec2(12.0, 34.0));
    t.zoom(2.0, pos2(300.0, 300.0));
    assert_eq!(t.scale, MAX_SCALE);
    assert_eq!(t.offset, vec2(12.0, 34.0));
}

#[test]
fn pan_and_reset() {
    let mut t = CanvasTransform::default();
    t.pan(vec2(10.0, -5.0));
    t.pan(vec2(-2.5, 40.0));
    assert_eq!(t.offset, vec2(7.5, 35.0));
    t.zoom(2.0, pos2(0.0, 0.0));
    t.reset();
    assert_eq!(t.scale, 1.0);
    assert_eq!(t.offset, vec2(0.0, 0.0));
}

// ---- geometry ----

#[test]
fn connector_uses_horizontal_controls_for_wide_spans() {
    let [p0, p1, p2, p3] = geometry::connector_points(pos2(0.0, 0.0), pos2(100.0, 10.0));
    assert_eq!(p0, pos2(0.0, 0.0));
    assert_eq!(p1, pos2(40.0, 0.0));
    assert_eq!(p2, pos2(60.0, 10.0));
    assert_eq!(p3, pos2(100.0, 10.0));
}

#[test]
fn connector_uses_vertical_controls_for_tall_spans() {
    let [p0, p1, p2, p3] = geometry::connector_points(pos2(0.0, 0.0), pos2(10.0, 100.0));
    assert_eq!(p0, pos2(0.0, 0.0));
    assert_eq!(p1, pos2(0.0, 40.0));
    assert_eq!(p2, pos2(10.0, 60.0));
    assert_eq!(p3, pos2(10.0, 100.0));
}

#[test]
fn grid_positions_follow_fixed_column_formula() {
    let step = GRID_CELL + GRID_GAP;
    let start = pos2(40.0, 40.0);
    assert_eq!(grid_position(start, 0), start);
    assert_eq!(grid_position(start, 3), pos2(40.0 + 3.0 * step, 40.0));
    // index 4 wraps to the second row
    assert_eq!(grid_position(start, 4), pos2(40.0, 40.0 + step));
    assert_eq!(grid_position(start, 9), pos2(40.0 + step, 40.0 + 2.0 * step));
}

// ---- connect mode ----

#[test]
fn connect_mode_emits_pairs_and_clears() {
    let mut mode = ConnectMode::default();
    assert!(!mode.is_active());
    mode.start("S");
    mode.toggle_target("A");
    mode.toggle_target("B");
    let pairs = mode.complete();
    assert_eq!(pairs, vec![("S".to_string(), "A".to_string()), ("S".to_string(), "B".to_string())]);
    assert!(!mode.is_active());
    assert_eq!(mode.complete(), Vec::new());
}

#[test]
fn connect_mode_source_toggle_is_noop() {
    let mut mode = ConnectMode::default();
    mode.start("S");
    mode.toggle_target("S");
    assert_eq!(mode.selection_len(), 0);
    mode.toggle_target("A");
    mode.toggle_target("A");
    assert_eq!(mode.selection_len(), 0);
}

#[test]
fn connect_mode_empty_complete_still_exits() {
    let mut mode = ConnectMode::default();
    mode.start("S");
    assert_eq!(mode.complete(), Vec::new());
    assert!(!mode.is_active());
}

#[test]
fn connect_mode_restart_resets_to_new_source() {
    let mut mode = ConnectMode::default();
    mode.start("S");
    mode.toggle_target("A");
    mode.start("T");
    assert_eq!(mode.source(), Some("T"));
    assert_eq!(mode.selection_len(), 0);
    mode.cancel();
    assert!(!mode.is_active());
}

// ---- disconnect mode ----

#[test]
fn disconnect_mode_ignores_non_neighbors() {
    let mut mode = DisconnectMode::default();
    mode.start("S", ["A", "B"].iter().map(|s| s.to_string()).collect());
    mode.toggle("C");
    assert!(!mode.is_marked("C"));
    mode.toggle("A");
    assert!(mode.is_marked("A"));
    let pairs = mode.complete();
    assert_eq!(pairs, vec![("S".to_string(), "A".to_string())]);
    assert!(!mode.is_active());
}

#[test]
fn disconnect_should_dim_truth_table() {
    let mut mode = DisconnectMode::default();
    assert!(!mode.should_dim("anything"));
    mode.start("S", ["A"].iter().map(|s| s.to_string()).collect());
    assert!(!mode.should_dim("S"));
    assert!(!mode.should_dim("A"));
    assert!(mode.should_dim("B"));
    mode.cancel();
    assert!(!mode.should_dim("B"));
}

// ---- live position cache ----

#[test]
fn live_cache_snapshot_never_clobbers_live_value() {
    let mut cache = LivePositionCache::new();
    cache.apply_snapshot(&[node("N", 0.0, 0.0)]);
    assert_eq!(cache.get("N"), Some(pos2(0.0, 0.0)));

    cache.live_update("N", pos2(5.0, 5.0));
    // a stale snapshot still carrying the old position must not win
    cache.apply_snapshot(&[node("N", 0.0, 0.0)]);
    assert_eq!(cache.get("N"), Some(pos2(5.0, 5.0)));
}

#[test]
fn live_cache_drops_vanished_ids_and_reseeds() {
    let mut cache = LivePositionCache::new();
    cache.apply_snapshot(&[node("A", 1.0, 1.0), node("B", 2.0, 2.0)]);
    cache.live_update("A", pos2(9.0, 9.0));

    cache.apply_snapshot(&[node("B", 2.0, 2.0)]);
    assert_eq!(cache.get("A"), None);
    assert_eq!(cache.len(), 1);

    // a reappearing id is seeded fresh from the store record
    cache.apply_snapshot(&[node("A", 3.0, 3.0), node("B", 2.0, 2.0)]);
    assert_eq!(cache.get("A"), Some(pos2(3.0, 3.0)));
}

// ---- entity store ----

#[test]
fn store_delete_node_cascades_connections() {
    let mut store = EntityStore::new();
    store.upsert_nodes(vec![node("A", 0.0, 0.0), node("B", 0.0, 0.0), node("C", 0.0, 0.0)]);
    store.insert_connection("A", "B").unwrap();
    let bc = store.insert_connection("B", "C").unwrap();
    store.insert_connection("C", "A").unwrap();

    assert!(store.delete_node("A"));
    assert_eq!(store.connection_count(), 1);
    assert!(store.connections_snapshot().iter().all(|c| !c.touches("A")));

    // deleting a connection leaves node records alone
    assert!(store.delete_connection(bc));
    assert_eq!(store.node_count(), 2);
}

#[test]
fn store_rejects_self_and_duplicate_connections() {
    let mut store = EntityStore::new();
    store.upsert_nodes(vec![node("A", 0.0, 0.0), node("B", 0.0, 0.0)]);
    assert!(store.insert_connection("A", "A").is_none());
    assert!(store.insert_connection("A", "B").is_some());
    // undirected: the reversed pair is the same edge
    assert!(store.insert_connection("B", "A").is_none());
    assert_eq!(store.connection_count(), 1);
}

#[test]
fn store_neighbors_union_both_directions() {
    let mut store = EntityStore::new();
    for id in ["A", "B", "C", "D"] {
        store.upsert_node(node(id, 0.0, 0.0));
    }
    store.insert_connection("A", "B").unwrap();
    store.insert_connection("C", "A").unwrap();
    let neighbors = store.neighbors_of("A");
    assert_eq!(neighbors.into_iter().collect::<Vec<_>>(), vec!["B".to_string(), "C".to_string()]);
    assert!(store.neighbors_of("D").is_empty());
}

#[test]
fn store_delete_between_removes_either_direction() {
    let mut store = EntityStore::new();
    store.upsert_nodes(vec![node("A", 0.0, 0.0), node("B", 0.0, 0.0)]);
    store.insert_connection("A", "B").unwrap();
    assert_eq!(store.delete_connection_between("B", "A"), 1);
    assert_eq!(store.connection_count(), 0);
}

#[test]
fn store_bulk_queries_and_wipes() {
    let mut store = EntityStore::new();
    store.upsert_node(node("root", 0.0, 0.0));
    let mut child = node("child", 1.0, 1.0);
    child.parent = Some("root".to_string());
    store.upsert_node(child);
    store.upsert_node(node("loose", 2.0, 2.0));
    store.insert_connection("root", "loose").unwrap();

    let roots = store.root_nodes();
    assert_eq!(roots.len(), 2);
    assert!(roots.iter().all(|n| n.parent.is_none()));
    assert_eq!(store.children_of("root").len(), 1);
    assert_eq!(store.connections_touching("loose").len(), 1);
    assert!(store.connections_touching("child").is_empty());

    store.delete_all_connections();
    assert_eq!(store.connection_count(), 0);
    assert_eq!(store.node_count(), 3);
    store.delete_all();
    assert_eq!(store.node_count(), 0);
}

#[test]
fn store_subscriptions_deliver_full_snapshots() {
    let mut store = EntityStore::new();
    store.upsert_node(node("A", 0.0, 0.0));

    let rx = store.subscribe_nodes();
    // initial snapshot arrives on subscribe
    let first = rx.try_recv().unwrap();
    assert_eq!(first.len(), 1);

    store.upsert_node(node("B", 1.0, 1.0));
    let second = rx.try_recv().unwrap();
    assert_eq!(second.len(), 2);

    // dropped receivers are pruned on the next publish without panicking
    drop(rx);
    store.upsert_node(node("C", 2.0, 2.0));
}

#[test]
fn store_parent_scoped_subscriptions() {
    let mut store = EntityStore::new();
    store.upsert_node(node("root", 0.0, 0.0));
    let mut child = node("child", 1.0, 1.0);
    child.parent = Some("root".to_string());
    store.upsert_node(child);

    let children_rx = store.subscribe_children("root");
    let roots_rx = store.subscribe_roots();
    let children = children_rx.try_recv().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, "child");
    let roots = roots_rx.try_recv().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].id, "root");

    let touching_rx = {
        store.insert_connection("root", "child").unwrap();
        store.subscribe_connections_touching("child")
    };
    assert_eq!(touching_rx.try_recv().unwrap().len(), 1);
}

// ---- controller / orchestration ----

#[test]
fn controller_drag_commit_writes_through_once() {
    let mut store = EntityStore::new();
    store.upsert_node(node("N", 0.0, 0.0));
    let mut c = CanvasController::new(store);

    c.live_update("N", pos2(42.0, 17.0));
    // store still holds the old position until the gesture ends
    assert_eq!(c.store().get_node("N").map(|n| (n.x, n.y)), Some((0.0, 0.0)));

    c.commit("N").unwrap();
    assert_eq!(c.store().get_node("N").map(|n| (n.x, n.y)), Some((42.0, 17.0)));
    assert!(c.commit("missing").is_err());
}

#[test]
fn controller_snapshot_preserves_live_positions() {
    let mut store = EntityStore::new();
    store.upsert_node(node("N", 0.0, 0.0));
    let mut c = CanvasController::new(store);

    c.live_update("N", pos2(5.0, 5.0));
    // an unrelated store change republished the old record for N
    c.add_reference(file_ref("other"), pos2(1.0, 1.0));
    c.process_store_events();
    assert_eq!(c.live_position("N"), Some(pos2(5.0, 5.0)));
}

#[test]
fn controller_batch_add_places_centered_grid() {
    let refs: Vec<ResolvedRef> = (0..9).map(|i| file_ref(&format!("f{}", i))).collect();
    let mut c = CanvasController::new(EntityStore::new());
    assert_eq!(c.add_references(refs, pos2(100.0, 100.0)), 9);

    let step = GRID_CELL + GRID_GAP;
    // 9 items on a 4-column grid: 4 columns and 3 rows around the center
    let start = pos2(100.0 - 1.5 * step, 100.0 - step);
    for i in 0..9usize {
        let expected = pos2(
            start.x + (i % 4) as f32 * step,
            start.y + (i / 4) as f32 * step,
        );
        let n = c.store().get_node(&format!("f{}", i)).unwrap();
        assert!(approx(pos2(n.x, n.y), expected), "node f{} misplaced", i);
        assert_eq!(c.live_position(&format!("f{}", i)), Some(expected));
    }
    assert_eq!(batch_grid_position(pos2(100.0, 100.0), 0, 9), start);
}

#[test]
fn controller_readds_are_deduped_by_stable_id() {
    let mut c = CanvasController::new(EntityStore::new());
    assert!(c.add_reference(file_ref("X"), pos2(10.0, 10.0)));
    c.live_update("X", pos2(50.0, 50.0));
    c.commit("X").unwrap();
    // second add of the same stable id keeps the committed position
    assert!(!c.add_reference(file_ref("X"), pos2(0.0, 0.0)));
    assert_eq!(c.store().get_node("X").map(|n| (n.x, n.y)), Some((50.0, 50.0)));
}

#[test]
fn controller_connect_flow_end_to_end() {
    let mut c = CanvasController::new(EntityStore::new());
    for id in ["S", "A", "B"] {
        c.add_reference(file_ref(id), pos2(0.0, 0.0));
    }
    c.begin_connect("S");
    c.toggle_connect_target("A");
    c.toggle_connect_target("B");
    c.toggle_connect_target("S"); // no-op
    assert_eq!(c.complete_connect(), 2);
    assert!(c.store().linked("S", "A"));
    assert!(c.store().linked("A", "S"));
    assert!(c.store().linked("S", "B"));
    assert_eq!(c.connections().len(), 2);

    // duplicates (either direction) are filtered on the next gesture
    c.begin_connect("A");
    c.toggle_connect_target("S");
    assert_eq!(c.complete_connect(), 0);
}

#[test]
fn controller_disconnect_flow_end_to_end() {
    let mut c = CanvasController::new(EntityStore::new());
    for id in ["S", "A", "B", "C"] {
        c.add_reference(file_ref(id), pos2(0.0, 0.0));
    }
    c.begin_connect("S");
    c.toggle_connect_target("A");
    c.toggle_connect_target("B");
    c.complete_connect();

    c.begin_disconnect("S");
    assert!(c.disconnect.is_neighbor("A"));
    assert!(!c.disconnect.is_neighbor("C"));
    assert!(c.disconnect.should_dim("C"));
    c.toggle_disconnect("A");
    c.toggle_disconnect("C"); // no-op
    assert_eq!(c.complete_disconnect(), 1);
    assert!(!c.store().linked("S", "A"));
    assert!(c.store().linked("S", "B"));
}

// ---- directory sync ----

#[test]
fn dir_sync_two_phase_appends_only_new_children() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
    std::fs::write(dir.path().join("b.txt"), b"b").unwrap();

    let parent = FsResolver.resolve(dir.path()).unwrap();
    assert!(parent.is_folder);
    let mut store = EntityStore::new();

    let first = sync_directory(&mut store, &parent.id);
    assert_eq!(first.len(), 2);
    let step = GRID_CELL + GRID_GAP;
    // sorted by id: a.txt lands on cell 0, b.txt on cell 1
    assert_eq!((first[0].x, first[0].y), (SYNC_GRID_START.x, SYNC_GRID_START.y));
    assert_eq!((first[1].x, first[1].y), (SYNC_GRID_START.x + step, SYNC_GRID_START.y));
    assert!(first.iter().all(|n| n.parent.as_deref() == Some(parent.id.as_str())));

    // user drags one child before the next sync
    let moved = first[0].id.clone();
    store.set_node_position(&moved, 999.0, 999.0);

    std::fs::write(dir.path().join("c.txt"), b"c").unwrap();
    let second = sync_directory(&mut store, &parent.id);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].display_name, "c.txt");
    // appended after the two known children, not overlapping them
    assert_eq!((second[0].x, second[0].y), (SYNC_GRID_START.x + 2.0 * step, SYNC_GRID_START.y));
    // existing nodes' positions are untouched
    assert_eq!(store.get_node(&moved).map(|n| (n.x, n.y)), Some((999.0, 999.0)));
    assert_eq!(store.node_count(), 3);
}

#[test]
fn dir_sync_missing_path_returns_empty() {
    let mut store = EntityStore::new();
    assert!(sync_directory(&mut store, "/definitely/not/a/real/path").is_empty());
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    std::fs::write(&file, b"x").unwrap();
    // a file is not a sync root either
    assert!(sync_directory(&mut store, file.to_str().unwrap()).is_empty());
    assert_eq!(store.node_count(), 0);
}

#[test]
fn dir_sync_marks_folders_and_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("f.txt"), b"f").unwrap();
    let parent = FsResolver.resolve(dir.path()).unwrap();
    let mut store = EntityStore::new();
    let created = sync_directory(&mut store, &parent.id);
    assert_eq!(created.len(), 2);
    let sub = created.iter().find(|n| n.display_name == "sub").unwrap();
    let f = created.iter().find(|n| n.display_name == "f.txt").unwrap();
    assert_eq!(sub.kind, NodeKind::Folder);
    assert_eq!(f.kind, NodeKind::File);
}

// ---- persistence ----

#[test]
fn persist_round_trip_and_versions() {
    let dir = tempfile::tempdir().unwrap();
    persist::set_settings_override(AppSettings {
        autosave_override: Some(dir.path().to_path_buf()),
        ..Default::default()
    });

    let mut store = EntityStore::new();
    store.upsert_nodes(vec![node("A", 1.5, -2.5), node("B", 10.0, 20.0)]);
    store.insert_connection("A", "B").unwrap();
    let transform = CanvasTransform::new(1.75, vec2(33.0, -7.0));

    let state = AppStateFile::from_runtime(&store, &transform);
    let path = persist::save_active(&state).unwrap();
    assert!(path.exists());

    let loaded = persist::load_active().unwrap().expect("state file present");
    let (restored, restored_transform) = loaded.into_runtime();
    assert_eq!(restored.node_count(), 2);
    assert_eq!(restored.get_node("A").map(|n| (n.x, n.y)), Some((1.5, -2.5)));
    assert!(restored.linked("A", "B"));
    assert_eq!(restored_transform.scale, 1.75);
    assert_eq!(restored_transform.offset, vec2(33.0, -7.0));

    // connection ids keep counting past restored records
    let mut restored = restored;
    let next = restored.insert_connection("B", "A");
    assert!(next.is_none()); // undirected duplicate
    restored.upsert_node(node("C", 0.0, 0.0));
    let id = restored.insert_connection("A", "C").unwrap();
    assert!(id > 1);

    let versioned = persist::save_versioned(&state).unwrap();
    assert!(versioned.exists());
    let versions = persist::list_versions().unwrap();
    assert!(versions.contains(&versioned));
}

// ---- export ----

#[test]
fn export_canvas_json_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = EntityStore::new();
    store.upsert_nodes(vec![node("A", 0.0, 0.0), node("B", 5.0, 5.0)]);
    store.insert_connection("A", "B").unwrap();

    let json_path = dir.path().join("canvas.json");
    export::export_canvas_json(&store, &json_path).unwrap();
    let text = std::fs::read_to_string(&json_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["connections"].as_array().unwrap().len(), 1);
    assert_eq!(parsed["nodes"][0]["neighbors"][0], "B");

    let (nodes_csv, conns_csv) = export::export_canvas_csv(&store, &dir.path().join("canvas")).unwrap();
    let nodes_text = std::fs::read_to_string(nodes_csv).unwrap();
    assert!(nodes_text.starts_with("id,display_name,kind,x,y,parent"));
    assert_eq!(nodes_text.lines().count(), 3);
    let conns_text = std::fs::read_to_string(conns_csv).unwrap();
    assert!(conns_text.lines().any(|l| l.contains("A") && l.contains("B")));
}
