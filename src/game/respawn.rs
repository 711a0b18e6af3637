//! Respawn Search
//!
//! Bounded random search for a spawn cell and heading. A candidate is
//! accepted when its own cell and the next [`RESPAWN_LOOKAHEAD`] cells
//! along the heading are blank. That guarantees a short safe run, not
//! survival; a player can still be boxed in right after the lookahead.

use crate::core::grid::{Direction, GridPos};
use crate::core::rng::SessionRng;
use crate::game::board::Board;

/// Candidates tried per search.
pub const RESPAWN_ATTEMPTS: usize = 100;

/// Cells that must be clear ahead of a spawn.
pub const RESPAWN_LOOKAHEAD: usize = 15;

/// An accepted spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnPoint {
    /// Spawn cell.
    pub position: GridPos,
    /// Initial heading.
    pub direction: Direction,
}

/// Search with the default attempt count and lookahead.
pub fn find_spawn(board: &Board, rng: &mut SessionRng) -> Option<SpawnPoint> {
    find_spawn_with(board, rng, RESPAWN_ATTEMPTS, RESPAWN_LOOKAHEAD)
}

/// Search with explicit limits.
///
/// Returns `None` after `attempts` rejected candidates; nothing is
/// written to the board either way.
pub fn find_spawn_with(
    board: &Board,
    rng: &mut SessionRng,
    attempts: usize,
    lookahead: usize,
) -> Option<SpawnPoint> {
    for _ in 0..attempts {
        let position = rng.interior_cell(board.width(), board.height());
        let direction = rng.direction();
        if board.get(position).is_blank() && path_is_clear(board, position, direction, lookahead) {
            return Some(SpawnPoint { position, direction });
        }
    }
    None
}

/// Whether the `lookahead` cells after `start` along `dir` are all blank.
pub fn path_is_clear(board: &Board, start: GridPos, dir: Direction, lookahead: usize) -> bool {
    let mut pos = start;
    for _ in 0..lookahead {
        let Some(next) = pos.step(dir) else { return false };
        match board.try_get(next) {
            Some(cell) if cell.is_blank() => pos = next,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{Cell, PlayerNumber};

    #[test]
    fn test_spawn_has_clear_lookahead() {
        let board = Board::new(64, 64).unwrap();
        let mut rng = SessionRng::new(3);

        for _ in 0..50 {
            let spawn = find_spawn(&board, &mut rng).expect("open board always has room");
            assert!(board.is_interior(spawn.position));
            assert!(path_is_clear(&board, spawn.position, spawn.direction, RESPAWN_LOOKAHEAD));
        }
    }

    #[test]
    fn test_lookahead_hits_wall() {
        let board = Board::new(32, 32).unwrap();
        // 14 interior cells to the left of x = 15, then the wall
        assert!(!path_is_clear(&board, GridPos::new(15, 10), Direction::Left, 15));
        assert!(path_is_clear(&board, GridPos::new(16, 10), Direction::Left, 15));
    }

    #[test]
    fn test_lookahead_hits_trail() {
        let mut board = Board::new(32, 32).unwrap();
        board.set(GridPos::new(10, 20), Cell::Owned(PlayerNumber(1)));
        assert!(!path_is_clear(&board, GridPos::new(10, 25), Direction::Up, 15));
    }

    #[test]
    fn test_full_board_gives_up() {
        let mut board = Board::new(32, 32).unwrap();
        for y in 1..31 {
            for x in 1..31 {
                board.set(GridPos::new(x, y), Cell::Owned(PlayerNumber(1)));
            }
        }
        let before = board.clone();
        let mut rng = SessionRng::new(11);

        assert_eq!(find_spawn(&board, &mut rng), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_lookahead_longer_than_board_gives_up() {
        let board = Board::new(32, 32).unwrap();
        let mut rng = SessionRng::new(5);
        assert_eq!(find_spawn_with(&board, &mut rng, 100, 40), None);
    }
}
