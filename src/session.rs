//! Game Session
//!
//! Owns the game state and drives it at a fixed frame rate. Everything
//! with its own clock (death timers, saves) runs on background tasks and
//! only talks back through channels, so the state has a single writer.
//!
//! Per frame:
//!
//! ```text
//! drain fired timers -> poll input -> tick -> react to events -> draw -> wait
//! ```

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, GameConfig};
use crate::core::hash::player_key;
use crate::game::board::{Board, PlayerNumber};
use crate::game::events::GameEventData;
use crate::game::state::{GameState, RosterError};
use crate::game::tick::{tick, TickResult};
use crate::game::timers::{DeathTimers, TimerAction, TimerFired};
use crate::persist::queue::SaveQueue;
use crate::persist::store::{PlayerStore, StatsRecord, StoreError};
use crate::render::frame::compose;
use crate::render::RenderGateway;

/// Session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Configuration rejected.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Startup load of the player list failed.
    #[error("Failed to restore player list: {0}")]
    Store(#[from] StoreError),

    /// Every player number is taken.
    #[error("Session is full")]
    SessionFull,

    /// A connected player already uses this name.
    #[error("Name already playing: {0}")]
    NameTaken(String),

    /// No connected player has this number.
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerNumber),
}

impl From<RosterError> for SessionError {
    fn from(e: RosterError) -> Self {
        match e {
            RosterError::Full(_) => SessionError::SessionFull,
            RosterError::NameTaken(name) => SessionError::NameTaken(name),
            RosterError::PlayerNotFound(n) => SessionError::PlayerNotFound(n),
        }
    }
}

/// A running game.
pub struct GameSession<R: RenderGateway> {
    config: GameConfig,
    state: GameState,
    store: Arc<dyn PlayerStore>,
    saves: SaveQueue,
    timers: DeathTimers,
    renderer: R,
}

impl<R: RenderGateway> GameSession<R> {
    /// Build a session.
    ///
    /// Fails if the config is out of range or the stored player list can't
    /// be read. Must be called from within a tokio runtime.
    pub fn new(config: GameConfig, store: Arc<dyn PlayerStore>, renderer: R) -> Result<Self, SessionError> {
        config.validate()?;
        let board = Board::new(config.width, config.height)?;

        let history = store.load_all()?;
        let seed = config.rng_seed.unwrap_or_else(clock_seed);
        debug!("Session seed: {}", seed);

        let mut state = GameState::new(board, config.max_players, config.respawn_delay, seed);
        state.seed_history(&history);
        info!(
            "Board {}x{}, up to {} players, {} known",
            config.width,
            config.height,
            config.max_players,
            history.len()
        );

        Ok(Self {
            timers: DeathTimers::new(config.respawn_delay, config.death_trail),
            saves: SaveQueue::spawn(Arc::clone(&store)),
            config,
            state,
            store,
            renderer,
        })
    }

    /// Connect a player. It is placed on the board by the next frame.
    ///
    /// A store read failure is not fatal: the player starts from zero.
    pub fn join(&mut self, name: &str) -> Result<PlayerNumber, SessionError> {
        let key = player_key(name);
        let (stored, found) = match self.store.load(&key) {
            Ok(Some(record)) => (Some(record), true),
            Ok(None) => (None, false),
            Err(e) => {
                warn!("Failed to load stats for {}: {}", name, e);
                (Some(StatsRecord::fresh(&key, name)), true)
            }
        };

        let number = self.state.join(name, stored)?;
        if !found {
            if let Some(player) = self.state.active_player(number) {
                self.saves.enqueue(player.snapshot());
            }
        }
        info!("{} joined as {}", name, number);
        Ok(number)
    }

    /// Disconnect a player: cancel its timers, clear its trail, save it.
    pub fn leave(&mut self, number: PlayerNumber) -> Result<StatsRecord, SessionError> {
        self.timers.cancel(number);
        let record = self.state.leave(number)?;
        self.saves.enqueue(record.clone());
        info!("{} left", record.name);
        Ok(record)
    }

    /// Run one frame at `now`.
    pub fn step(&mut self, now: Instant) -> TickResult {
        for fired in self.timers.drain() {
            self.apply_timer(fired);
        }

        let input = self.renderer.poll_direction();
        let result = tick(&mut self.state, input, now);
        self.react(&result);

        let standings = self.state.scoreboard.standings(&self.state.players);
        let frame = compose(&self.state.board, &standings);
        self.renderer.draw_frame(&frame);

        result
    }

    /// Frame loop. Returns once the display is closed.
    pub async fn run(&mut self) {
        let period = self.config.tick_interval;
        let mut pacing = interval_at(Instant::now() + period, period);
        pacing.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Game loop started ({:?} per frame)", self.config.tick_interval);
        while !self.renderer.is_closed() {
            self.step(Instant::now());
            pacing.tick().await;
        }
        info!("Display closed after {} ticks", self.state.tick);
    }

    /// Stop every timer and wait for queued saves.
    pub async fn shutdown(&mut self) {
        self.timers.cancel_all();
        self.saves.flush().await;
        info!("Session shut down");
    }

    /// Wait until every queued save has been attempted.
    pub async fn flush_saves(&self) {
        self.saves.flush().await;
    }

    /// Game state, read-only.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Render gateway.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Death timers still running.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    fn apply_timer(&mut self, fired: TimerFired) {
        let TimerFired { player, life, action } = fired;
        let (clear, release) = match action {
            TimerAction::ClearTrail => (true, false),
            TimerAction::Release => (false, true),
            TimerAction::ClearAndRelease => (true, true),
        };
        if clear && self.state.expire_trail(player, life) {
            debug!("Cleared trail of {}", player);
        }
        if release && self.state.release(player, life) {
            debug!("{} may respawn", player);
        }
    }

    fn react(&mut self, result: &TickResult) {
        for event in &result.events {
            match event.data {
                GameEventData::PlayerSpawned { player, position, direction } => {
                    debug!("{} spawned at ({}, {}) heading {}", player, position.x, position.y, direction);
                }
                GameEventData::SpawnFailed { player } => {
                    warn!("No safe spawn point for {}, retrying next frame", player);
                }
                GameEventData::PlayerDied { victim, cause, life } => {
                    if let Some(p) = self.state.active_player(victim) {
                        self.saves.enqueue(p.snapshot());
                        debug!("{} died ({:?})", p.name, cause);
                    }
                    self.timers.start(victim, life);
                }
                GameEventData::KillCredited { killer, victim, kills } => {
                    let victim_name = self
                        .state
                        .active_player(victim)
                        .map(|p| p.name.clone())
                        .unwrap_or_default();
                    if let Some(p) = self.state.active_player(killer) {
                        self.saves.enqueue(p.snapshot());
                        info!("{} killed {} ({} kills)", p.name, victim_name, kills);
                    }
                }
            }
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

// =============================================================================
// TESTS
// =============================================================================
