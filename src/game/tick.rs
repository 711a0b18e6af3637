//! Simulation Tick
//!
//! One step of the game: every connected player either gets placed
//! (if waiting for a spawn) or moves one cell and resolves what it hit.
//! Players are visited in ascending player-number order.
//!
//! The tick never sleeps or touches storage. Deaths and kills come back
//! as events and the session decides what to persist or schedule.

use tokio::time::Instant;

use crate::core::grid::Direction;
use crate::game::board::{Cell, PlayerNumber};
use crate::game::collision::{resolve_step, DeathCause, StepOutcome};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::steer;
use crate::game::respawn::find_spawn;
use crate::game::state::{GameState, Phase};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
}

impl TickResult {
    /// Deaths this tick as `(victim, cause, life)`.
    pub fn deaths(&self) -> impl Iterator<Item = (PlayerNumber, DeathCause, u32)> + '_ {
        self.events.iter().filter_map(|e| match e.data {
            GameEventData::PlayerDied { victim, cause, life } => Some((victim, cause, life)),
            _ => None,
        })
    }

    /// Players credited with a kill this tick.
    pub fn killers(&self) -> impl Iterator<Item = PlayerNumber> + '_ {
        self.events.iter().filter_map(|e| match e.data {
            GameEventData::KillCredited { killer, .. } => Some(killer),
            _ => None,
        })
    }
}

/// Run one simulation tick.
///
/// `input` is the heading pressed this frame, if any; it steers every
/// moving player. `now` timestamps deaths and countdowns.
pub fn tick(state: &mut GameState, input: Option<Direction>, now: Instant) -> TickResult {
    let mut result = TickResult::default();
    state.tick += 1;

    for number in state.active_numbers() {
        let Some(player) = state.active_player(number) else {
            continue;
        };

        if player.wants_spawn() {
            spawn_player(state, number, &mut result);
        } else if player.is_alive() {
            move_player(state, number, input, now, &mut result);
        }
        // Dead and still waiting: skipped until the release timer fires.
    }

    // Countdown text moves every frame while anyone is waiting
    if state.players.values().any(|p| p.waiting) {
        state.scoreboard.mark_dirty();
    }
    if state.scoreboard.is_dirty() {
        state.recompute_scoreboard(now);
    }

    result
}

/// Place a Ready (or released Dead) player. Placement uses up its move.
fn spawn_player(state: &mut GameState, number: PlayerNumber, result: &mut TickResult) {
    let Some(spawn) = find_spawn(&state.board, &mut state.rng) else {
        result.events.push(GameEvent::spawn_failed(state.tick, number));
        return;
    };

    state.board.set(spawn.position, Cell::Owned(number));
    if let Some(player) = state.active_player_mut(number) {
        player.position = spawn.position;
        player.direction = spawn.direction;
        player.phase = Phase::Playing;
        player.waiting = false;
    }
    state.scoreboard.mark_dirty();
    result.events.push(GameEvent::player_spawned(
        state.tick,
        number,
        spawn.position,
        spawn.direction,
    ));
}

/// Steer, step one cell, and resolve the destination.
fn move_player(
    state: &mut GameState,
    number: PlayerNumber,
    input: Option<Direction>,
    now: Instant,
    result: &mut TickResult,
) {
    let Some(player) = state.active_player_mut(number) else {
        return;
    };
    player.direction = steer(player.direction, input);
    let (from, dir) = (player.position, player.direction);

    let outcome = resolve_step(&state.board, from, dir);
    match outcome.death_cause(number) {
        None => {
            if let StepOutcome::Advance(dest) = outcome {
                state.board.set(dest, Cell::Owned(number));
                if let Some(player) = state.active_player_mut(number) {
                    player.position = dest;
                }
            }
        }
        Some(cause) => {
            if let Some(killer) = cause.killer() {
                credit_kill(state, killer, number, now, result);
            }
            kill_player(state, number, cause, now, result);
        }
    }
}

/// The trail owner gets one kill, if still connected.
fn credit_kill(
    state: &mut GameState,
    killer: PlayerNumber,
    victim: PlayerNumber,
    now: Instant,
    result: &mut TickResult,
) {
    let Some(owner) = state.active_player_mut(killer) else {
        return;
    };
    owner.kills += 1;
    let kills = owner.kills;

    result.events.push(GameEvent::kill_credited(state.tick, killer, victim, kills));
    state.recompute_scoreboard(now);
}

/// Crash: mark dead, start the cooldown. Position stays on the last good cell.
fn kill_player(
    state: &mut GameState,
    number: PlayerNumber,
    cause: DeathCause,
    now: Instant,
    result: &mut TickResult,
) {
    let Some(player) = state.active_player_mut(number) else {
        return;
    };
    player.phase = Phase::Dead;
    player.waiting = true;
    player.died_at = Some(now);
    player.deaths += 1;
    player.life += 1;
    let life = player.life;

    result.events.push(GameEvent::player_died(state.tick, number, cause, life));
    state.recompute_scoreboard(now);
}

// =============================================================================
// TESTS
// =============================================================================
