//! Core primitives.
//!
//! Grid coordinates, the seeded RNG and hashing helpers. Nothing in here
//! knows about players or timing.

pub mod grid;
pub mod rng;
pub mod hash;

// Re-export core types
pub use grid::{Direction, GridPos};
pub use rng::SessionRng;
pub use hash::{player_key, StateHash, StateHasher};
