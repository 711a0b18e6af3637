//! Game Logic Module
//!
//! The grid simulation. Everything here except `timers` is synchronous
//! and deterministic given the session seed and the input sequence.
//!
//! ## Module Structure
//!
//! - `board`: Cell grid and ownership
//! - `state`: Players, roster, session state
//! - `input`: Key sampling and steering
//! - `collision`: Single-step outcome resolution
//! - `respawn`: Random spawn-point search
//! - `tick`: Per-frame simulation step
//! - `scoreboard`: Ranking and status lines
//! - `timers`: Post-death trail clear and respawn release
//! - `events`: What a tick produced

pub mod board;
pub mod state;
pub mod input;
pub mod collision;
pub mod respawn;
pub mod tick;
pub mod scoreboard;
pub mod timers;
pub mod events;

// Re-export key types
pub use board::{Board, Cell, PlayerNumber};
pub use state::{GameState, Player, Phase, PlayerStatus, RosterError};
pub use input::{KeyState, steer};
pub use collision::{DeathCause, StepOutcome};
pub use respawn::SpawnPoint;
pub use tick::{tick, TickResult};
pub use scoreboard::Scoreboard;
pub use timers::{DeathTimers, TimerAction, TimerFired};
pub use events::{GameEvent, GameEventData};
