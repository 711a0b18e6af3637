//! Death Timers
//!
//! After a crash the trail stays visible for at least the death-trail
//! duration, and the player waits out the respawn delay. Both phases run
//! on tokio tasks, one per death. A task never touches the board: it
//! reports back through a channel and the session applies the result on
//! its own tick.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::game::board::PlayerNumber;

/// When the two post-death phases fire, measured from the death.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeathSchedule {
    /// Delay until the trail is cleared.
    pub clear_after: Duration,
    /// Further delay, after the clear, until the player is released.
    /// Zero means clear and release together.
    pub release_after: Duration,
}

impl DeathSchedule {
    /// Split the respawn delay around the death-trail minimum.
    ///
    /// - `respawn_delay > death_trail`: clear at `death_trail`, release
    ///   `respawn_delay - death_trail` later.
    /// - otherwise: clear and release together at `respawn_delay`.
    pub fn plan(respawn_delay: Duration, death_trail: Duration) -> Self {
        if respawn_delay > death_trail {
            Self {
                clear_after: death_trail,
                release_after: respawn_delay - death_trail,
            }
        } else {
            Self {
                clear_after: respawn_delay,
                release_after: Duration::ZERO,
            }
        }
    }
}

/// What a fired timer asks the session to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerAction {
    /// Sweep the trail.
    ClearTrail,
    /// Clear the waiting flag.
    Release,
    /// Both at once.
    ClearAndRelease,
}

/// A timer that has fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerFired {
    /// Player the timer belongs to.
    pub player: PlayerNumber,
    /// Life counter at scheduling time.
    pub life: u32,
    /// Requested action.
    pub action: TimerAction,
}

/// Per-player death timers.
///
/// Scheduling a new timer for a player aborts any older one still running.
pub struct DeathTimers {
    schedule: DeathSchedule,
    tx: mpsc::UnboundedSender<TimerFired>,
    rx: mpsc::UnboundedReceiver<TimerFired>,
    pending: HashMap<PlayerNumber, JoinHandle<()>>,
}

impl DeathTimers {
    /// Create timers for the given delays.
    pub fn new(respawn_delay: Duration, death_trail: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            schedule: DeathSchedule::plan(respawn_delay, death_trail),
            tx,
            rx,
            pending: HashMap::new(),
        }
    }

    /// Start the post-death sequence for `player`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, player: PlayerNumber, life: u32) {
        let plan = self.schedule;
        let tx = self.tx.clone();

        let handle = tokio::spawn(async move {
            sleep(plan.clear_after).await;
            if plan.release_after.is_zero() {
                let _ = tx.send(TimerFired { player, life, action: TimerAction::ClearAndRelease });
                return;
            }
            if tx.send(TimerFired { player, life, action: TimerAction::ClearTrail }).is_err() {
                return;
            }
            sleep(plan.release_after).await;
            let _ = tx.send(TimerFired { player, life, action: TimerAction::Release });
        });

        if let Some(old) = self.pending.insert(player, handle) {
            old.abort();
        }
    }

    /// Abort the player's running timer, if any.
    pub fn cancel(&mut self, player: PlayerNumber) -> bool {
        match self.pending.remove(&player) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Abort everything.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }

    /// Timers that fired since the last call, in firing order. Never blocks.
    pub fn drain(&mut self) -> Vec<TimerFired> {
        let mut fired = Vec::new();
        while let Ok(t) = self.rx.try_recv() {
            fired.push(t);
        }
        self.pending.retain(|_, handle| !handle.is_finished());
        fired
    }

    /// Timers still running.
    pub fn pending(&self) -> usize {
        self.pending.values().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for DeathTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
