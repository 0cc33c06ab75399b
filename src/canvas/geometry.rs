use eframe::egui::{Pos2, Vec2};

// Fixed node card dimensions in canvas units. Hit testing and connector
// endpoints both assume these, so they are shared constants rather than
// per-node state.
pub const NODE_WIDTH: f32 = 120.0;
pub const NODE_HEIGHT: f32 = 72.0;

// Grid auto-placement: fixed column count, square cell plus gap.
pub const GRID_COLS: usize = 4;
pub const GRID_CELL: f32 = 140.0;
pub const GRID_GAP: f32 = 24.0;

// Where directory-sync children start filling in, in canvas units.
pub const SYNC_GRID_START: Pos2 = Pos2::new(40.0, 40.0);

pub fn node_center(pos: Pos2) -> Pos2 {
    pos + Vec2::new(NODE_WIDTH * 0.5, NODE_HEIGHT * 0.5)
}

/// Position of the `index`-th cell on the fixed-column grid anchored at
/// `start`: row = index / COLS, col = index % COLS.
pub fn grid_position(start: Pos2, index: usize) -> Pos2 {
    let step = GRID_CELL + GRID_GAP;
    let col = (index % GRID_COLS) as f32;
    let row = (index / GRID_COLS) as f32;
    Pos2::new(start.x + col * step, start.y + row * step)
}

/// Grid position for a batch of `count` items centered on `center`.
/// Same row/col formula as `grid_position`, with the anchor shifted so the
/// occupied grid extent is symmetric around the target point.
pub fn batch_grid_position(center: Pos2, index: usize, count: usize) -> Pos2 {
    let step = GRID_CELL + GRID_GAP;
    let cols = GRID_COLS.min(count.max(1));
    let rows = count.max(1).div_ceil(GRID_COLS);
    let start = Pos2::new(
        center.x - (cols - 1) as f32 * step * 0.5,
        center.y - (rows - 1) as f32 * step * 0.5,
    );
    grid_position(start, index)
}

/// Cubic bezier control polygon between two node centers.
///
/// The control points follow the dominant axis of displacement: mostly
/// horizontal separations get horizontal-style control points at 40% of dx
/// from each end (each keeping its endpoint's y), otherwise the symmetric
/// vertical construction is used.
pub fn connector_points(a: Pos2, b: Pos2) -> [Pos2; 4] {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    if dx.abs() > dy.abs() {
        let c = dx * 0.4;
        [a, Pos2::new(a.x + c, a.y), Pos2::new(b.x - c, b.y), b]
    } else {
        let c = dy * 0.4;
        [a, Pos2::new(a.x, a.y + c), Pos2::new(b.x, b.y - c), b]
    }
}
