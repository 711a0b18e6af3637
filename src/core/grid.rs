//! Grid Coordinates and Headings
//!
//! Integer cell positions and the four cardinal directions a player can
//! travel in. `(0, 0)` is the top-left corner; `y` grows downward.

use serde::{Serialize, Deserialize};

/// A cell coordinate on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
}

impl GridPos {
    /// Create a position.
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step along `dir`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the board's concern.
    #[inline]
    pub fn step(self, dir: Direction) -> Option<GridPos> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(GridPos { x, y })
    }
}

/// Cardinal heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward row 0
    Up,
    /// Toward the last row
    Down,
    /// Toward column 0
    Left,
    /// Toward the last column
    Right,
}

impl Direction {
    /// All headings, in the order random spawns index them.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
    ];

    /// Unit offset for one step.
    #[inline]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_moves_one_cell() {
        let p = GridPos::new(5, 5);
        assert_eq!(p.step(Direction::Up), Some(GridPos::new(5, 4)));
        assert_eq!(p.step(Direction::Down), Some(GridPos::new(5, 6)));
        assert_eq!(p.step(Direction::Left), Some(GridPos::new(4, 5)));
        assert_eq!(p.step(Direction::Right), Some(GridPos::new(6, 5)));
    }

    #[test]
    fn test_step_off_origin_is_none() {
        assert_eq!(GridPos::new(0, 3).step(Direction::Left), None);
        assert_eq!(GridPos::new(3, 0).step(Direction::Up), None);
    }
}
