//! Collision Detection
//!
//! Resolves a one-cell move against the board. Crashes are ordinary
//! outcomes here, not errors.

use crate::core::grid::{Direction, GridPos};
use crate::game::board::{Board, Cell, PlayerNumber};

/// Outcome of moving one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Destination is blank; the mover claims it.
    Advance(GridPos),
    /// Destination is wall (or off the board).
    Wall,
    /// Destination belongs to a trail.
    Trail {
        /// Trail owner.
        owner: PlayerNumber,
    },
}

/// Why a player died.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathCause {
    /// Ran into the border.
    Wall,
    /// Ran into its own trail.
    OwnTrail,
    /// Ran into another player's trail.
    Trail(PlayerNumber),
}

impl DeathCause {
    /// Player credited with the kill, if any.
    pub fn killer(self) -> Option<PlayerNumber> {
        match self {
            DeathCause::Trail(owner) => Some(owner),
            DeathCause::Wall | DeathCause::OwnTrail => None,
        }
    }
}

impl StepOutcome {
    /// Classify as a death for `mover`, or `None` for a clean move.
    pub fn death_cause(self, mover: PlayerNumber) -> Option<DeathCause> {
        match self {
            StepOutcome::Advance(_) => None,
            StepOutcome::Wall => Some(DeathCause::Wall),
            StepOutcome::Trail { owner } if owner == mover => Some(DeathCause::OwnTrail),
            StepOutcome::Trail { owner } => Some(DeathCause::Trail(owner)),
        }
    }
}

/// Resolve a move from `from` one cell along `dir`.
pub fn resolve_step(board: &Board, from: GridPos, dir: Direction) -> StepOutcome {
    let Some(dest) = from.step(dir) else {
        return StepOutcome::Wall;
    };
    match board.try_get(dest) {
        Some(Cell::Blank) => StepOutcome::Advance(dest),
        Some(Cell::Owned(owner)) => StepOutcome::Trail { owner },
        Some(Cell::Wall) | None => StepOutcome::Wall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_advances() {
        let board = Board::new(32, 32).unwrap();
        let out = resolve_step(&board, GridPos::new(5, 5), Direction::Right);
        assert_eq!(out, StepOutcome::Advance(GridPos::new(6, 5)));
        assert_eq!(out.death_cause(PlayerNumber(1)), None);
    }

    #[test]
    fn test_border_is_wall() {
        let board = Board::new(32, 32).unwrap();
        let out = resolve_step(&board, GridPos::new(1, 5), Direction::Left);
        assert_eq!(out, StepOutcome::Wall);
        assert_eq!(out.death_cause(PlayerNumber(1)), Some(DeathCause::Wall));
    }

    #[test]
    fn test_trail_owner_decides_cause() {
        let mut board = Board::new(32, 32).unwrap();
        board.set(GridPos::new(6, 5), Cell::Owned(PlayerNumber(2)));
        let out = resolve_step(&board, GridPos::new(5, 5), Direction::Right);
        assert_eq!(out, StepOutcome::Trail { owner: PlayerNumber(2) });

        assert_eq!(out.death_cause(PlayerNumber(2)), Some(DeathCause::OwnTrail));
        let cause = out.death_cause(PlayerNumber(1)).unwrap();
        assert_eq!(cause, DeathCause::Trail(PlayerNumber(2)));
        assert_eq!(cause.killer(), Some(PlayerNumber(2)));
        assert_eq!(DeathCause::OwnTrail.killer(), None);
    }
}
