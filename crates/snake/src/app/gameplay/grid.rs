use engine::{Vec2, Viewport};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub(crate) const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub(crate) const fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    pub(crate) fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// A turn must change both components, which rules out repeating the
    /// current heading and reversing onto the body.
    pub(crate) fn accepts_turn_to(self, next: Direction) -> bool {
        let current = self.vector();
        let next = next.vector();
        current.x != next.x && current.y != next.y
    }
}

/// Top-left corner of a uniformly chosen grid cell. `size` must be non-empty
/// and `cell_size` non-zero.
pub(crate) fn random_cell(size: Viewport, cell_size: u32, rng: &mut impl Rng) -> Vec2 {
    let x = rng.random_range(0..size.width) / cell_size * cell_size;
    let y = rng.random_range(0..size.height) / cell_size * cell_size;
    Vec2::new(x as f32, y as f32)
}

pub(crate) fn step_cell(cell: Vec2, direction: Direction, cell_size: u32) -> Vec2 {
    let delta = direction.vector();
    let cell_size = cell_size as f32;
    Vec2::new(cell.x + delta.x * cell_size, cell.y + delta.y * cell_size)
}

pub(crate) fn wrap_cell(cell: Vec2, size: Viewport, cell_size: u32) -> Vec2 {
    Vec2::new(
        wrap_axis(cell.x, size.width, cell_size),
        wrap_axis(cell.y, size.height, cell_size),
    )
}

fn wrap_axis(value: f32, extent: u32, cell_size: u32) -> f32 {
    if value < 0.0 {
        (extent - extent % cell_size) as f32
    } else if value >= extent as f32 {
        0.0
    } else {
        value
    }
}
