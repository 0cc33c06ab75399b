use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::data::store::EntityStore;

// Helpers for exporting the whole canvas (nodes + connections).

pub fn export_canvas_json(store: &EntityStore, path: &Path) -> anyhow::Result<()> {
    use std::fs::File;
    use std::io::Write;
    #[derive(serde::Serialize)]
    struct NodeOut<'a> {
        id: &'a str,
        display_name: &'a str,
        kind: &'a str,
        x: f32,
        y: f32,
        parent: Option<&'a str>,
        neighbors: Vec<&'a str>,
    }
    #[derive(serde::Serialize)]
    struct ConnOut<'a> {
        id: i64,
        source: &'a str,
        target: &'a str,
    }
    #[derive(serde::Serialize)]
    struct CanvasOut<'a> {
        nodes: Vec<NodeOut<'a>>,
        connections: Vec<ConnOut<'a>>,
    }

    let nodes = store.nodes_snapshot();
    let connections = store.connections_snapshot();
    let mut node_outs: Vec<NodeOut> = Vec::with_capacity(nodes.len());
    for n in &nodes {
        let mut neighbors: BTreeSet<&str> = BTreeSet::new();
        for c in &connections {
            if c.source == n.id {
                neighbors.insert(&c.target);
            } else if c.target == n.id {
                neighbors.insert(&c.source);
            }
        }
        node_outs.push(NodeOut {
            id: &n.id,
            display_name: &n.display_name,
            kind: kind_str(n),
            x: n.x,
            y: n.y,
            parent: n.parent.as_deref(),
            neighbors: neighbors.into_iter().collect(),
        });
    }
    let conn_outs: Vec<ConnOut> =
        connections.iter().map(|c| ConnOut { id: c.id, source: &c.source, target: &c.target }).collect();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let f = File::create(path)?;
    serde_json::to_writer_pretty(f, &CanvasOut { nodes: node_outs, connections: conn_outs })?;
    // ensure newline at end
    let mut f2 = std::fs::OpenOptions::new().append(true).open(path)?;
    let _ = f2.write_all(b"\n");
    Ok(())
}

/// CSV export writes two files derived from the base path:
/// `{stem}_nodes.csv` and `{stem}_connections.csv`.
pub fn export_canvas_csv(store: &EntityStore, base_path: &Path) -> anyhow::Result<(PathBuf, PathBuf)> {
    let parent = base_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;
    let stem = base_path.file_stem().and_then(|s| s.to_str()).unwrap_or("canvas");
    let nodes_path = parent.join(format!("{}_nodes.csv", stem));
    let conns_path = parent.join(format!("{}_connections.csv", stem));
    {
        let mut wtr = csv::Writer::from_path(&nodes_path)?;
        wtr.write_record(["id", "display_name", "kind", "x", "y", "parent"])?;
        for n in store.nodes_snapshot() {
            wtr.write_record(&[
                n.id.clone(),
                n.display_name.clone(),
                kind_str(&n).to_string(),
                n.x.to_string(),
                n.y.to_string(),
                n.parent.clone().unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    }
    {
        let mut wtr = csv::Writer::from_path(&conns_path)?;
        wtr.write_record(["id", "source", "target"])?;
        for c in store.connections_snapshot() {
            wtr.write_record(&[c.id.to_string(), c.source.clone(), c.target.clone()])?;
        }
        wtr.flush()?;
    }
    Ok((nodes_path, conns_path))
}

fn kind_str(n: &crate::data::entities::CanvasNode) -> &'static str {
    match n.kind {
        crate::data::entities::NodeKind::Folder => "folder",
        crate::data::entities::NodeKind::File => "file",
    }
}
