//! Game Events
//!
//! What happened during a tick. The session reacts to these (saves,
//! death timers, logging); the simulation itself never does I/O.

use crate::core::grid::{Direction, GridPos};
use crate::game::board::PlayerNumber;
use crate::game::collision::DeathCause;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEventData {
    /// Player placed on the board.
    PlayerSpawned {
        /// Who was placed.
        player: PlayerNumber,
        /// Spawn cell.
        position: GridPos,
        /// Initial heading.
        direction: Direction,
    },

    /// Respawn search ran out of attempts; retried next tick.
    SpawnFailed {
        /// Who is still waiting for a spot.
        player: PlayerNumber,
    },

    /// Player crashed.
    PlayerDied {
        /// Who crashed.
        victim: PlayerNumber,
        /// What they ran into.
        cause: DeathCause,
        /// Victim's life counter after this death; tags its timers.
        life: u32,
    },

    /// Trail owner credited for a crash.
    KillCredited {
        /// Owner of the trail that was hit.
        killer: PlayerNumber,
        /// Player who hit it.
        victim: PlayerNumber,
        /// Killer's kill count after the credit.
        kills: u32,
    },
}

/// A game event with the tick it happened on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u64,
    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u64, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create player spawned event.
    pub fn player_spawned(tick: u64, player: PlayerNumber, position: GridPos, direction: Direction) -> Self {
        Self::new(tick, GameEventData::PlayerSpawned { player, position, direction })
    }

    /// Create spawn failed event.
    pub fn spawn_failed(tick: u64, player: PlayerNumber) -> Self {
        Self::new(tick, GameEventData::SpawnFailed { player })
    }

    /// Create player died event.
    pub fn player_died(tick: u64, victim: PlayerNumber, cause: DeathCause, life: u32) -> Self {
        Self::new(tick, GameEventData::PlayerDied { victim, cause, life })
    }

    /// Create kill credited event.
    pub fn kill_credited(tick: u64, killer: PlayerNumber, victim: PlayerNumber, kills: u32) -> Self {
        Self::new(tick, GameEventData::KillCredited { killer, victim, kills })
    }
}
