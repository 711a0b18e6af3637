//! # Gridtrail
//!
//! Tick-driven grid trail game for several local players sharing one
//! keyboard. Every frame each player advances one cell and claims it;
//! running into a wall or any trail is a crash. The owner of the trail
//! gets the kill.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        GRIDTRAIL                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── grid.rs     - Cell coordinates and headings             │
//! │  ├── rng.rs      - Seeded Xorshift128+ PRNG                  │
//! │  └── hash.rs     - Player keys and board digests             │
//! │                                                              │
//! │  game/           - Simulation (single writer, no I/O)        │
//! │  ├── board.rs    - Wall-bordered occupancy grid              │
//! │  ├── state.rs    - Players and roster                        │
//! │  ├── tick.rs     - Per-frame step                            │
//! │  ├── respawn.rs  - Spawn-point search                        │
//! │  ├── scoreboard.rs - Standings                               │
//! │  └── timers.rs   - Post-death trail clear and release        │
//! │                                                              │
//! │  render/         - Frame composition, render gateway         │
//! │  persist/        - Player store, background saves            │
//! │  session.rs      - Frame loop tying it all together          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! `core/` and `game/` (timers aside) never read the clock or touch
//! storage. Given the same seed, roster and inputs, two sessions produce
//! the same board, which [`game::GameState::digest`] makes easy to check.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod persist;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use self::core::grid::{Direction, GridPos};
pub use game::board::{Board, Cell, PlayerNumber};
pub use game::state::{GameState, Player};
pub use persist::{JsonFileStore, MemoryStore, PlayerStore, StatsRecord, StoreError};
pub use render::{Frame, HeadlessRenderer, RenderGateway};
pub use session::{GameSession, SessionError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Smallest allowed board side, border included.
pub const BOARD_MIN_SIDE: usize = 32;

/// Largest allowed board side, border included.
pub const BOARD_MAX_SIDE: usize = 256;

/// Player palette slots; caps the number of simultaneous players.
pub const MAX_PLAYER_SLOTS: usize = 8;
