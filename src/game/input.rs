//! Directional Input
//!
//! Several arrow keys can be held at once. They resolve to one heading
//! with a fixed precedence: left, then right, then down, then up.

use crate::core::grid::Direction;

/// Arrow keys held during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    /// Left arrow held
    pub left: bool,
    /// Right arrow held
    pub right: bool,
    /// Down arrow held
    pub down: bool,
    /// Up arrow held
    pub up: bool,
}

impl KeyState {
    /// Nothing held.
    pub const NONE: KeyState = KeyState {
        left: false,
        right: false,
        down: false,
        up: false,
    };

    /// Only the key for `dir` held.
    pub fn only(dir: Direction) -> Self {
        let mut keys = Self::NONE;
        match dir {
            Direction::Left => keys.left = true,
            Direction::Right => keys.right = true,
            Direction::Down => keys.down = true,
            Direction::Up => keys.up = true,
        }
        keys
    }

    /// Resolve to a single heading, left > right > down > up.
    pub fn direction(&self) -> Option<Direction> {
        if self.left {
            Some(Direction::Left)
        } else if self.right {
            Some(Direction::Right)
        } else if self.down {
            Some(Direction::Down)
        } else if self.up {
            Some(Direction::Up)
        } else {
            None
        }
    }
}

/// Heading after this frame's input: the pressed one, else unchanged.
#[inline]
pub fn steer(current: Direction, pressed: Option<Direction>) -> Direction {
    pressed.unwrap_or(current)
}
