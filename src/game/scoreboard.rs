//! Scoreboard
//!
//! Ranked standings over every known player, connected or not. Ordering:
//! kills descending, then deaths ascending, then name, then key.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::game::state::Player;

/// Derived standings plus a dirty flag.
#[derive(Clone, Debug, Default)]
pub struct Scoreboard {
    /// Persistence keys, best first.
    order: Vec<String>,
    /// Something changed since the last compute.
    dirty: bool,
}

impl Scoreboard {
    /// Empty, dirty scoreboard.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            dirty: true,
        }
    }

    /// Flag for recompute.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Needs a recompute.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rank everyone and refresh their sidebar text. Marks clean.
    pub fn compute(&mut self, players: &mut BTreeMap<String, Player>, now: Instant, respawn_delay: Duration) {
        let mut ranked: Vec<&Player> = players.values().collect();
        ranked.sort_by(|a, b| standing_order(a, b));
        self.order = ranked.into_iter().map(|p| p.key.clone()).collect();

        for (i, key) in self.order.iter().enumerate() {
            if let Some(player) = players.get_mut(key) {
                player.rank = i + 1;
                player.status_lines = [
                    player.name.clone(),
                    format!("  rank  #{:03}", player.rank),
                    format!("  {}", player.status(now, respawn_delay)),
                    format!("  kills {:4}", player.kills),
                ];
            }
        }

        self.dirty = false;
    }

    /// Keys in rank order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Players in rank order.
    pub fn standings<'a>(&'a self, players: &'a BTreeMap<String, Player>) -> Vec<&'a Player> {
        self.order.iter().filter_map(|key| players.get(key)).collect()
    }
}

/// Kills desc, deaths asc, name asc, key asc.
fn standing_order(a: &Player, b: &Player) -> Ordering {
    b.kills
        .cmp(&a.kills)
        .then(a.deaths.cmp(&b.deaths))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.key.cmp(&b.key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Phase;
    use proptest::prelude::*;

    fn roster(stats: &[(&str, u32, u32)]) -> BTreeMap<String, Player> {
        stats
            .iter()
            .map(|(name, kills, deaths)| {
                let mut p = Player::new(name);
                p.kills = *kills;
                p.deaths = *deaths;
                (p.key.clone(), p)
            })
            .collect()
    }

    #[test]
    fn test_order_and_tie_breaks() {
        let mut players = roster(&[
            ("carol", 2, 5),
            ("alice", 5, 1),
            ("bob", 2, 3),
            ("dave", 2, 3),
        ]);
        let mut board = Scoreboard::new();
        board.compute(&mut players, Instant::now(), Duration::from_secs(2));

        let names: Vec<&str> = board
            .standings(&players)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["alice", "bob", "dave", "carol"]);

        let ranks: Vec<usize> = board.standings(&players).iter().map(|p| p.rank).collect();
        assert_eq!(ranks, [1, 2, 3, 4]);
        assert!(!board.is_dirty());
    }

    #[test]
    fn test_status_lines() {
        let mut players = roster(&[("alice", 12, 0)]);
        players.values_mut().for_each(|p| p.phase = Phase::Playing);
        let mut board = Scoreboard::new();
        board.compute(&mut players, Instant::now(), Duration::from_secs(2));

        let p = players.values().next().unwrap();
        assert_eq!(p.status_lines[0], "alice");
        assert_eq!(p.status_lines[1], "  rank  #001");
        assert_eq!(p.status_lines[2], "  playing");
        assert_eq!(p.status_lines[3], "  kills   12");
    }

    proptest! {
        #[test]
        fn prop_kills_non_increasing_and_idempotent(
            stats in proptest::collection::vec((0u32..20, 0u32..20), 1..12)
        ) {
            let names: Vec<String> = (0..stats.len()).map(|i| format!("p{}", i)).collect();
            let entries: Vec<(&str, u32, u32)> = names
                .iter()
                .zip(&stats)
                .map(|(n, (k, d))| (n.as_str(), *k, *d))
                .collect();
            let mut players = roster(&entries);
            let now = Instant::now();
            let delay = Duration::from_secs(2);

            let mut board = Scoreboard::new();
            board.compute(&mut players, now, delay);
            let first = board.order().to_vec();

            let standings = board.standings(&players);
            for pair in standings.windows(2) {
                prop_assert!(pair[0].kills >= pair[1].kills);
            }

            board.compute(&mut players, now, delay);
            prop_assert_eq!(first, board.order().to_vec());
        }
    }
}
