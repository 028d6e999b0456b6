pub const SNAP_THRESHOLD_DEFAULT: f32 = 20.0;
pub const SNAP_THRESHOLD_MIN: f32 = 1.0;
pub const SNAP_THRESHOLD_MAX: f32 = 200.0;

pub const BOARD_LOCK_THRESHOLD_DEFAULT: f32 = 25.0;
pub const BOARD_LOCK_THRESHOLD_MIN: f32 = 1.0;
pub const BOARD_LOCK_THRESHOLD_MAX: f32 = 250.0;

pub const GRID_SIZE_DEFAULT: u32 = 3;
pub const GRID_SIZE_MAX: u32 = 256;
pub const PIECE_SIZE_DEFAULT: f32 = 100.0;

pub const TRAY_SEED_DEFAULT: u32 = 0x5EED_2520;
pub const TRAY_MARGIN_DEFAULT: f32 = 8.0;
pub const TRAY_GAP_RATIO: f32 = 0.5;

pub type Point = (f32, f32);

pub fn distance(a: Point, b: Point) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

pub fn offset(base: Point, delta: Point) -> Point {
    (base.0 + delta.0, base.1 + delta.1)
}

pub fn grid_delta(from: (u32, u32), to: (u32, u32), size: f32) -> Point {
    let dx = to.0 as i64 - from.0 as i64;
    let dy = to.1 as i64 - from.1 as i64;
    (dx as f32 * size, dy as f32 * size)
}

/// 4-neighbour adjacency on the solved grid; diagonals never count.
pub fn is_grid_neighbor(a: (u32, u32), b: (u32, u32)) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

pub fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

pub fn rand_unit(seed: u32, salt: u32) -> f32 {
    let mixed = splitmix32(seed ^ salt);
    let top = mixed >> 8;
    top as f32 / ((1u32 << 24) as f32)
}

pub fn rand_range(seed: u32, salt: u32, min: f32, max: f32) -> f32 {
    min + (max - min) * rand_unit(seed, salt)
}

/// Rectangle in world space where loose pieces start out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrayArea {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl TrayArea {
    /// A strip to the right of the solved board, as tall as the board.
    pub fn beside_board(grid_size: u32, piece_size: f32) -> Self {
        let board = grid_size as f32 * piece_size;
        Self {
            min_x: board + piece_size * TRAY_GAP_RATIO,
            min_y: 0.0,
            width: board.max(piece_size),
            height: board.max(piece_size),
            margin: TRAY_MARGIN_DEFAULT,
        }
    }
}

/// Scattered start positions plus the order groups are created in.
///
/// `positions` is indexed by piece id (`grid_y * grid_size + grid_x`);
/// `order` is a seeded shuffle of piece ids.
#[derive(Clone, Debug, PartialEq)]
pub struct TrayLayout {
    pub positions: Vec<Point>,
    pub order: Vec<usize>,
}

pub fn scramble_layout(seed: u32, grid_size: u32, piece_size: f32, tray: &TrayArea) -> TrayLayout {
    let total = (grid_size as usize) * (grid_size as usize);
    let min_x = tray.min_x + tray.margin;
    let mut max_x = tray.min_x + tray.width - piece_size - tray.margin;
    let min_y = tray.min_y + tray.margin;
    let mut max_y = tray.min_y + tray.height - piece_size - tray.margin;
    if max_x < min_x {
        max_x = min_x;
    }
    if max_y < min_y {
        max_y = min_y;
    }

    let mut positions = Vec::with_capacity(total);
    for id in 0..total {
        let salt = (id as u32) << 1;
        let x = rand_range(seed, salt, min_x, max_x);
        let y = rand_range(seed, salt + 1, min_y, max_y);
        positions.push((x, y));
    }

    let mut order: Vec<usize> = (0..total).collect();
    for i in (1..order.len()).rev() {
        let salt = 0xC0DE_u32 + i as u32;
        let j = ((rand_unit(seed, salt) * (i as f32 + 1.0)) as usize).min(i);
        order.swap(i, j);
    }
    TrayLayout { positions, order }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_are_manhattan_one() {
        assert!(is_grid_neighbor((1, 1), (2, 1)));
        assert!(is_grid_neighbor((1, 1), (1, 0)));
        assert!(!is_grid_neighbor((1, 1), (1, 1)));
        assert!(!is_grid_neighbor((1, 1), (2, 2)));
        assert!(!is_grid_neighbor((0, 0), (2, 0)));
    }

    #[test]
    fn scramble_stays_inside_tray() {
        let tray = TrayArea::beside_board(4, 50.0);
        let layout = scramble_layout(7, 4, 50.0, &tray);
        assert_eq!(layout.positions.len(), 16);
        for (x, y) in &layout.positions {
            assert!(*x >= tray.min_x + tray.margin);
            assert!(*x + 50.0 <= tray.min_x + tray.width - tray.margin + 0.001);
            assert!(*y >= tray.min_y + tray.margin);
        }
        let mut sorted = layout.order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn scramble_is_deterministic_per_seed() {
        let tray = TrayArea::beside_board(3, 100.0);
        assert_eq!(scramble_layout(1, 3, 100.0, &tray), scramble_layout(1, 3, 100.0, &tray));
        assert_ne!(
            scramble_layout(1, 3, 100.0, &tray).positions,
            scramble_layout(2, 3, 100.0, &tray).positions
        );
    }
}
