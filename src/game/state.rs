//! Game State Definitions
//!
//! Players, their lifecycle, and the single-owner [`GameState`] the
//! simulation mutates. Player records are keyed by persistence key and
//! kept in a `BTreeMap` so iteration (and therefore the tick) is ordered.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::core::grid::{Direction, GridPos};
use crate::core::hash::{player_key, StateHash};
use crate::core::rng::SessionRng;
use crate::game::board::{Board, Cell, PlayerNumber};
use crate::game::scoreboard::Scoreboard;
use crate::persist::store::StatsRecord;

/// Number of text lines a player occupies in the sidebar.
pub const STATUS_LINES: usize = 4;

// =============================================================================
// PLAYER LIFECYCLE
// =============================================================================

/// Where a player is in its lifecycle.
///
/// ```text
/// NotReady -> Ready -> Playing -> Dead -> Playing -> ...
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Known from a previous session but not connected.
    #[default]
    NotReady,
    /// Joined; placed on the board by the next tick.
    Ready,
    /// On the board and moving.
    Playing,
    /// Crashed. Respawns once `waiting` clears and a safe spot is found.
    Dead,
}

/// Display status derived from phase, waiting flag and death time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerStatus {
    /// Offline.
    NotReady,
    /// Dead and still inside the respawn delay.
    Dead {
        /// Time left before the player may respawn.
        remaining: Duration,
    },
    /// Joined or dead-and-eligible, waiting for a spawn point.
    Ready,
    /// Alive.
    Playing,
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerStatus::NotReady => f.write_str("not ready"),
            PlayerStatus::Dead { remaining } => {
                write!(f, "dead, {:.1}s remaining", remaining.as_secs_f32())
            }
            PlayerStatus::Ready => f.write_str("ready"),
            PlayerStatus::Playing => f.write_str("playing"),
        }
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// A known player, active or historical.
#[derive(Clone, Debug)]
pub struct Player {
    /// Board identifier while connected.
    pub number: Option<PlayerNumber>,
    /// Display name.
    pub name: String,
    /// Stable persistence key.
    pub key: String,
    /// Head position. Meaningful only while playing.
    pub position: GridPos,
    /// Current heading.
    pub direction: Direction,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Post-death cooldown in progress.
    pub waiting: bool,
    /// When the player last died.
    pub died_at: Option<Instant>,
    /// Players who crashed into this player's trail.
    pub kills: u32,
    /// Times this player crashed.
    pub deaths: u32,
    /// Death counter for this session; tags death timers.
    pub life: u32,
    /// Scoreboard rank (1-based), refreshed by the scoreboard.
    pub rank: usize,
    /// Sidebar text, refreshed by the scoreboard.
    pub status_lines: [String; STATUS_LINES],
}

impl Player {
    /// A player with zeroed stats.
    pub fn new(name: &str) -> Self {
        Self {
            number: None,
            name: name.to_string(),
            key: player_key(name),
            position: GridPos::default(),
            direction: Direction::Up,
            phase: Phase::NotReady,
            waiting: false,
            died_at: None,
            kills: 0,
            deaths: 0,
            life: 0,
            rank: 0,
            status_lines: Default::default(),
        }
    }

    /// Rebuild an offline player from a stored record.
    pub fn from_record(record: &StatsRecord) -> Self {
        let mut player = Self::new(&record.name);
        player.key = record.key.clone();
        player.kills = record.kills;
        player.deaths = record.deaths;
        player
    }

    /// Copy of the persisted fields.
    pub fn snapshot(&self) -> StatsRecord {
        StatsRecord {
            key: self.key.clone(),
            name: self.name.clone(),
            kills: self.kills,
            deaths: self.deaths,
        }
    }

    /// Alive and on the board.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Currently connected.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.number.is_some()
    }

    /// Eligible for the respawn search this tick.
    #[inline]
    pub fn wants_spawn(&self) -> bool {
        match self.phase {
            Phase::Ready => true,
            Phase::Dead => !self.waiting,
            Phase::NotReady | Phase::Playing => false,
        }
    }

    /// Status as shown in the sidebar.
    pub fn status(&self, now: Instant, respawn_delay: Duration) -> PlayerStatus {
        match self.phase {
            Phase::NotReady => PlayerStatus::NotReady,
            Phase::Dead if self.waiting => {
                let elapsed = self
                    .died_at
                    .map(|t| now.saturating_duration_since(t))
                    .unwrap_or_default();
                PlayerStatus::Dead {
                    remaining: respawn_delay.saturating_sub(elapsed),
                }
            }
            Phase::Dead | Phase::Ready => PlayerStatus::Ready,
            Phase::Playing => PlayerStatus::Playing,
        }
    }
}

// =============================================================================
// ROSTER ERRORS
// =============================================================================

/// Join/leave failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// Every player number is taken.
    #[error("Game is full ({0} players)")]
    Full(usize),

    /// A connected player already uses this name.
    #[error("Name already playing: {0}")]
    NameTaken(String),

    /// No connected player has this number.
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerNumber),
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Everything the simulation owns.
///
/// Only the session's simulation task holds this, through `&mut`.
#[derive(Debug)]
pub struct GameState {
    /// The playing field.
    pub board: Board,
    /// All known players (active and historical), by persistence key.
    pub players: BTreeMap<String, Player>,
    /// Connected players, by board number.
    active: BTreeMap<PlayerNumber, String>,
    /// Ranked standings.
    pub scoreboard: Scoreboard,
    /// Spawn randomness.
    pub rng: SessionRng,
    /// Player cap.
    pub max_players: usize,
    /// Respawn delay, needed for countdown text.
    pub respawn_delay: Duration,
    /// Ticks simulated so far.
    pub tick: u64,
}

impl GameState {
    /// Create an empty game on `board`.
    pub fn new(board: Board, max_players: usize, respawn_delay: Duration, seed: u64) -> Self {
        Self {
            board,
            players: BTreeMap::new(),
            active: BTreeMap::new(),
            scoreboard: Scoreboard::new(),
            rng: SessionRng::new(seed),
            max_players,
            respawn_delay,
            tick: 0,
        }
    }

    /// Register previously seen players so they show up in the standings.
    pub fn seed_history(&mut self, records: &[StatsRecord]) {
        for record in records {
            self.players
                .entry(record.key.clone())
                .or_insert_with(|| Player::from_record(record));
        }
        self.scoreboard.mark_dirty();
    }

    /// Connect a player under `name`.
    ///
    /// `stored` is the persisted record, if any; when absent, a returning
    /// historical player keeps the counters already in memory. The player
    /// enters [`Phase::Ready`] and is placed by the next tick.
    pub fn join(&mut self, name: &str, stored: Option<StatsRecord>) -> Result<PlayerNumber, RosterError> {
        let key = player_key(name);
        if self.players.get(&key).is_some_and(Player::is_active) {
            return Err(RosterError::NameTaken(name.to_string()));
        }
        let number = self.free_number().ok_or(RosterError::Full(self.max_players))?;

        let player = self.players.entry(key.clone()).or_insert_with(|| Player::new(name));
        if let Some(record) = stored {
            player.kills = record.kills;
            player.deaths = record.deaths;
        }
        player.number = Some(number);
        player.phase = Phase::Ready;
        player.waiting = false;
        player.died_at = None;

        self.active.insert(number, key);
        self.scoreboard.mark_dirty();
        Ok(number)
    }

    /// Disconnect a player.
    ///
    /// Clears the trail, frees the number and keeps the record as
    /// historical. Returns the departed player's stats.
    pub fn leave(&mut self, number: PlayerNumber) -> Result<StatsRecord, RosterError> {
        let key = self
            .active
            .remove(&number)
            .ok_or(RosterError::PlayerNotFound(number))?;
        self.board.clear_owner(number);

        let player = self
            .players
            .get_mut(&key)
            .ok_or(RosterError::PlayerNotFound(number))?;
        player.number = None;
        player.phase = Phase::NotReady;
        player.waiting = false;
        player.died_at = None;

        self.scoreboard.mark_dirty();
        Ok(player.snapshot())
    }

    /// Connected player numbers, ascending.
    pub fn active_numbers(&self) -> Vec<PlayerNumber> {
        self.active.keys().copied().collect()
    }

    /// Number of connected players.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Connected player by number.
    pub fn active_player(&self, number: PlayerNumber) -> Option<&Player> {
        self.active.get(&number).and_then(|key| self.players.get(key))
    }

    /// Connected player by number, mutably.
    pub fn active_player_mut(&mut self, number: PlayerNumber) -> Option<&mut Player> {
        let key = self.active.get(&number)?;
        self.players.get_mut(key)
    }

    /// Any known player by name.
    pub fn player_named(&self, name: &str) -> Option<&Player> {
        self.players.get(&player_key(name))
    }

    /// Recompute standings now.
    pub fn recompute_scoreboard(&mut self, now: Instant) {
        self.scoreboard.compute(&mut self.players, now, self.respawn_delay);
    }

    /// Death-trail expiry: sweep the player's cells.
    ///
    /// Ignored if the player has since left or died again (`life` moved on).
    pub fn expire_trail(&mut self, number: PlayerNumber, life: u32) -> bool {
        let current = self.active_player(number).map(|p| (p.life, p.phase));
        match current {
            Some((l, Phase::Dead)) if l == life => {
                self.board.clear_owner(number);
                true
            }
            _ => false,
        }
    }

    /// Respawn-delay expiry: the player may respawn from the next tick.
    pub fn release(&mut self, number: PlayerNumber, life: u32) -> bool {
        let released = match self.active_player_mut(number) {
            Some(p) if p.life == life && p.phase == Phase::Dead => {
                p.waiting = false;
                true
            }
            _ => false,
        };
        if released {
            self.scoreboard.mark_dirty();
        }
        released
    }

    /// Board digest, for comparing two runs.
    pub fn digest(&self) -> StateHash {
        self.board.digest()
    }

    /// Check the occupancy invariant: every live player stands on its own cell.
    pub fn invariants_hold(&self) -> bool {
        self.active.iter().all(|(number, key)| {
            let Some(p) = self.players.get(key) else { return false };
            !p.is_alive()
                || (self.board.is_interior(p.position)
                    && self.board.get(p.position) == Cell::Owned(*number))
        })
    }

    fn free_number(&self) -> Option<PlayerNumber> {
        (1..=self.max_players)
            .map(|n| PlayerNumber(n as u8))
            .find(|n| !self.active.contains_key(n))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state(max_players: usize) -> GameState {
        GameState::new(Board::new(32, 32).unwrap(), max_players, Duration::from_secs(2), 1)
    }

    #[test]
    fn test_join_assigns_lowest_free_number() {
        let mut state = test_state(4);
        assert_eq!(state.join("a", None), Ok(PlayerNumber(1)));
        assert_eq!(state.join("b", None), Ok(PlayerNumber(2)));
        state.leave(PlayerNumber(1)).unwrap();
        assert_eq!(state.join("c", None), Ok(PlayerNumber(1)));
    }

    #[test]
    fn test_join_full_and_duplicate() {
        let mut state = test_state(1);
        state.join("a", None).unwrap();
        assert_eq!(state.join("a", None), Err(RosterError::NameTaken("a".into())));
        assert_eq!(state.join("b", None), Err(RosterError::Full(1)));
    }

    #[test]
    fn test_join_loads_stored_counters() {
        let mut state = test_state(2);
        let record = StatsRecord {
            key: player_key("a"),
            name: "a".into(),
            kills: 7,
            deaths: 3,
        };
        let n = state.join("a", Some(record)).unwrap();
        let p = state.active_player(n).unwrap();
        assert_eq!((p.kills, p.deaths), (7, 3));
        assert_eq!(p.phase, Phase::Ready);
    }

    #[test]
    fn test_historical_player_is_promoted_on_join() {
        let mut state = test_state(2);
        state.seed_history(&[StatsRecord {
            key: player_key("old"),
            name: "old".into(),
            kills: 4,
            deaths: 9,
        }]);
        assert!(!state.player_named("old").unwrap().is_active());

        let n = state.join("old", None).unwrap();
        let p = state.active_player(n).unwrap();
        assert_eq!((p.kills, p.deaths), (4, 9));
        assert_eq!(state.players.len(), 1);
    }

    #[test]
    fn test_leave_clears_trail_and_keeps_history() {
        let mut state = test_state(2);
        let n = state.join("a", None).unwrap();
        state.board.set(GridPos::new(5, 5), Cell::Owned(n));

        let record = state.leave(n).unwrap();
        assert_eq!(record.name, "a");
        assert_eq!(state.board.owned_count(n), 0);
        assert_eq!(state.active_count(), 0);
        assert_eq!(state.player_named("a").unwrap().phase, Phase::NotReady);
        assert_eq!(state.leave(n), Err(RosterError::PlayerNotFound(n)));
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut state = test_state(2);
        let n = state.join("a", None).unwrap();
        {
            let p = state.active_player_mut(n).unwrap();
            p.phase = Phase::Dead;
            p.waiting = true;
            p.life = 2;
        }
        state.board.set(GridPos::new(5, 5), Cell::Owned(n));

        assert!(!state.expire_trail(n, 1));
        assert!(!state.release(n, 1));
        assert_eq!(state.board.owned_count(n), 1);

        assert!(state.expire_trail(n, 2));
        assert!(state.release(n, 2));
        assert_eq!(state.board.owned_count(n), 0);
        assert!(!state.active_player(n).unwrap().waiting);
    }

    #[test]
    fn test_status_text() {
        let now = Instant::now();
        let delay = Duration::from_secs(2);
        let mut p = Player::new("a");
        assert_eq!(p.status(now, delay).to_string(), "not ready");

        p.phase = Phase::Ready;
        assert_eq!(p.status(now, delay).to_string(), "ready");

        p.phase = Phase::Dead;
        p.waiting = true;
        p.died_at = Some(now);
        assert_eq!(
            p.status(now + Duration::from_millis(500), delay).to_string(),
            "dead, 1.5s remaining"
        );

        p.waiting = false;
        assert_eq!(p.status(now, delay), PlayerStatus::Ready);

        p.phase = Phase::Playing;
        assert_eq!(p.status(now, delay).to_string(), "playing");
    }
}
