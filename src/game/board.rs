//! Occupancy Board
//!
//! Fixed-size grid of cells. After construction the outer ring is wall and
//! everything inside starts blank. Players claim cells permanently as they
//! move; a dead player's claims are swept away by [`Board::clear_owner`].

use serde::{Serialize, Deserialize};

use crate::config::{check_board_size, ConfigError};
use crate::core::grid::GridPos;
use crate::core::hash::{StateHash, StateHasher};

/// Player number, unique among currently active players (1..=max players).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerNumber(pub u8);

impl PlayerNumber {
    /// Raw value.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for PlayerNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Contents of one board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Free to move into.
    #[default]
    Blank,
    /// Border.
    Wall,
    /// Trail claimed by a player.
    Owned(PlayerNumber),
}

impl Cell {
    /// True for [`Cell::Blank`].
    #[inline]
    pub fn is_blank(self) -> bool {
        matches!(self, Cell::Blank)
    }

    fn tag(self) -> u8 {
        match self {
            Cell::Blank => 0,
            Cell::Wall => 0xFF,
            Cell::Owned(n) => n.0,
        }
    }
}

/// The playing field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Row-major cells, `cells[y * width + x]`.
    cells: Vec<Cell>,
}

impl Board {
    /// Build a bordered board.
    ///
    /// Fails with [`ConfigError`] unless both sides are within [32, 256].
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        check_board_size(width, height)?;
        Ok(Self::bordered(width, height))
    }

    /// Build a bordered board of any size of at least 3x3.
    ///
    /// Skips the [32, 256] range check; used for small hand-built scenarios.
    pub(crate) fn bordered(width: usize, height: usize) -> Self {
        assert!(width >= 3 && height >= 3, "board needs an interior");
        let mut board = Self {
            width,
            height,
            cells: vec![Cell::Blank; width * height],
        };
        for x in 0..width {
            board.set(GridPos::new(x, 0), Cell::Wall);
            board.set(GridPos::new(x, height - 1), Cell::Wall);
        }
        for y in 0..height {
            board.set(GridPos::new(0, y), Cell::Wall);
            board.set(GridPos::new(width - 1, y), Cell::Wall);
        }
        board
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `pos` lies inside `[0, width) x [0, height)`.
    #[inline]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Whether `pos` lies strictly inside the border ring.
    #[inline]
    pub fn is_interior(&self, pos: GridPos) -> bool {
        pos.x >= 1 && pos.y >= 1 && pos.x + 1 < self.width && pos.y + 1 < self.height
    }

    /// Read a cell, or `None` outside the board.
    #[inline]
    pub fn try_get(&self, pos: GridPos) -> Option<Cell> {
        self.contains(pos).then(|| self.cells[self.index(pos)])
    }

    /// Read a cell.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the board; callers only ever pass
    /// coordinates derived from an in-board position.
    #[inline]
    pub fn get(&self, pos: GridPos) -> Cell {
        self.check(pos);
        self.cells[self.index(pos)]
    }

    /// Write a cell.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the board.
    #[inline]
    pub fn set(&mut self, pos: GridPos, cell: Cell) {
        self.check(pos);
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    /// Reset every cell owned by `owner` to blank.
    ///
    /// Returns the number of cells cleared.
    pub fn clear_owner(&mut self, owner: PlayerNumber) -> usize {
        let mut cleared = 0;
        for cell in self.cells.iter_mut() {
            if *cell == Cell::Owned(owner) {
                *cell = Cell::Blank;
                cleared += 1;
            }
        }
        cleared
    }

    /// Number of cells currently owned by `owner`.
    pub fn owned_count(&self, owner: PlayerNumber) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Owned(owner)).count()
    }

    /// SHA-256 over the dimensions and every cell in row-major order.
    pub fn digest(&self) -> StateHash {
        let mut hasher = StateHasher::for_board();
        hasher.update_usize(self.width);
        hasher.update_usize(self.height);
        for cell in &self.cells {
            hasher.update_u8(cell.tag());
        }
        hasher.finalize()
    }

    #[inline]
    fn index(&self, pos: GridPos) -> usize {
        pos.y * self.width + pos.x
    }

    #[inline]
    fn check(&self, pos: GridPos) {
        assert!(
            self.contains(pos),
            "cell ({}, {}) outside {}x{} board",
            pos.x, pos.y, self.width, self.height
        );
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_out_of_range_sides() {
        assert_eq!(Board::new(31, 64), Err(ConfigError::WidthOutOfRange(31)));
        assert_eq!(Board::new(257, 64), Err(ConfigError::WidthOutOfRange(257)));
        assert_eq!(Board::new(64, 0), Err(ConfigError::HeightOutOfRange(0)));
        assert_eq!(Board::new(64, 300), Err(ConfigError::HeightOutOfRange(300)));
    }

    #[test]
    fn test_extreme_sizes_accepted() {
        assert!(Board::new(32, 32).is_ok());
        assert!(Board::new(256, 256).is_ok());
        assert!(Board::new(32, 256).is_ok());
    }

    #[test]
    fn test_clear_owner_only_touches_owner() {
        let mut board = Board::new(32, 32).unwrap();
        let a = PlayerNumber(1);
        let b = PlayerNumber(2);
        board.set(GridPos::new(3, 3), Cell::Owned(a));
        board.set(GridPos::new(4, 3), Cell::Owned(a));
        board.set(GridPos::new(5, 3), Cell::Owned(b));

        assert_eq!(board.clear_owner(a), 2);
        assert_eq!(board.get(GridPos::new(3, 3)), Cell::Blank);
        assert_eq!(board.get(GridPos::new(4, 3)), Cell::Blank);
        assert_eq!(board.get(GridPos::new(5, 3)), Cell::Owned(b));
        assert_eq!(board.get(GridPos::new(0, 3)), Cell::Wall);
    }

    #[test]
    fn test_try_get_never_wraps() {
        let board = Board::new(32, 40).unwrap();
        assert_eq!(board.try_get(GridPos::new(32, 0)), None);
        assert_eq!(board.try_get(GridPos::new(0, 40)), None);
        assert_eq!(board.try_get(GridPos::new(31, 39)), Some(Cell::Wall));
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_range_panics() {
        let board = Board::new(32, 32).unwrap();
        board.get(GridPos::new(32, 5));
    }

    #[test]
    #[should_panic]
    fn test_set_out_of_range_panics() {
        let mut board = Board::new(32, 32).unwrap();
        // (33, 0) would alias (1, 1) in the flat buffer
        board.set(GridPos::new(33, 0), Cell::Blank);
    }

    #[test]
    fn test_digest_tracks_cells() {
        let mut board = Board::new(32, 32).unwrap();
        let before = board.digest();
        board.set(GridPos::new(10, 10), Cell::Owned(PlayerNumber(3)));
        assert_ne!(before, board.digest());
        board.clear_owner(PlayerNumber(3));
        assert_eq!(before, board.digest());
    }

    proptest! {
        #[test]
        fn prop_border_is_wall_interior_is_blank(w in 32usize..=256, h in 32usize..=256) {
            let board = Board::new(w, h).unwrap();
            for y in 0..h {
                for x in 0..w {
                    let pos = GridPos::new(x, y);
                    let expected = if board.is_interior(pos) { Cell::Blank } else { Cell::Wall };
                    prop_assert_eq!(board.get(pos), expected);
                }
            }
        }

        #[test]
        fn prop_access_outside_is_rejected(w in 32usize..=64, h in 32usize..=64, dx in 0usize..10, dy in 0usize..10) {
            let board = Board::new(w, h).unwrap();
            prop_assert_eq!(board.try_get(GridPos::new(w + dx, dy)), None);
            prop_assert_eq!(board.try_get(GridPos::new(dx, h + dy)), None);
        }
    }
}
