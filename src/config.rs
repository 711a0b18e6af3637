//! Game Configuration
//!
//! Defaults mirror a small local game: a 60x60 board, six players and a
//! two second respawn delay. Every field can be overridden from the
//! environment (a `.env` file is honoured by the binary).

use std::path::PathBuf;
use std::time::Duration;

use crate::{BOARD_MAX_SIDE, BOARD_MIN_SIDE, MAX_PLAYER_SLOTS};

/// Configuration errors. All of them abort construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Board width outside [32, 256].
    #[error("width must be between {min}-{max}, got {0}", min = BOARD_MIN_SIDE, max = BOARD_MAX_SIDE)]
    WidthOutOfRange(usize),

    /// Board height outside [32, 256].
    #[error("height must be between {min}-{max}, got {0}", min = BOARD_MIN_SIDE, max = BOARD_MAX_SIDE)]
    HeightOutOfRange(usize),

    /// Player cap outside what the palette can colour.
    #[error("max players must be between 1-{max}, got {0}", max = MAX_PLAYER_SLOTS)]
    MaxPlayersOutOfRange(usize),

    /// Frame pacing of zero would spin the loop.
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
}

/// Configuration surface consumed by the session.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Board width in cells, border included.
    pub width: usize,
    /// Board height in cells, border included.
    pub height: usize,
    /// Maximum simultaneous players.
    pub max_players: usize,
    /// Frame pacing; every player moves one cell per frame.
    pub tick_interval: Duration,
    /// Time a dead player waits before becoming eligible to respawn.
    pub respawn_delay: Duration,
    /// Minimum time a dead player's trail stays on the board.
    pub death_trail: Duration,
    /// Location of the score store.
    pub store_path: PathBuf,
    /// Wipe all stored scores on open.
    pub reset_store: bool,
    /// Seed for respawn placement. `None` seeds from the clock.
    pub rng_seed: Option<u64>,
    /// Names joined by the demo binary at startup.
    pub player_names: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 60,
            max_players: 6,
            tick_interval: Duration::from_micros(62_500), // 16 frames per second
            respawn_delay: Duration::from_secs(2),
            death_trail: Duration::from_secs(1),
            store_path: std::env::temp_dir().join("gridtrail.json"),
            reset_store: false,
            rng_seed: None,
            player_names: vec!["player".to_string()],
        }
    }
}

impl GameConfig {
    /// Load config from environment or use defaults.
    ///
    /// Unparsable values are logged and ignored. Range checks happen in
    /// [`GameConfig::validate`], not here.
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Some(width) = env_parse::<usize>("GRIDTRAIL_WIDTH") {
            config.width = width;
        }
        if let Some(height) = env_parse::<usize>("GRIDTRAIL_HEIGHT") {
            config.height = height;
        }
        if let Some(max_players) = env_parse::<usize>("GRIDTRAIL_MAX_PLAYERS") {
            config.max_players = max_players;
        }
        if let Some(ms) = env_parse::<u64>("GRIDTRAIL_TICK_MS") {
            config.tick_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("GRIDTRAIL_RESPAWN_MS") {
            config.respawn_delay = Duration::from_millis(ms);
        }
        if let Ok(path) = std::env::var("GRIDTRAIL_STORE") {
            config.store_path = PathBuf::from(path);
        }
        if let Some(reset) = env_parse::<bool>("GRIDTRAIL_RESET") {
            config.reset_store = reset;
        }
        if let Some(seed) = env_parse::<u64>("GRIDTRAIL_SEED") {
            config.rng_seed = Some(seed);
        }
        if let Ok(names) = std::env::var("GRIDTRAIL_PLAYERS") {
            let names: Vec<String> = names
                .split(',')
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect();
            if names.is_empty() {
                tracing::warn!("GRIDTRAIL_PLAYERS has no names, using default");
            } else {
                config.player_names = names;
            }
        }

        config
    }

    /// Check the board and player limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_board_size(self.width, self.height)?;
        if self.max_players == 0 || self.max_players > MAX_PLAYER_SLOTS {
            return Err(ConfigError::MaxPlayersOutOfRange(self.max_players));
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

/// Reject board sides outside [32, 256].
pub fn check_board_size(width: usize, height: usize) -> Result<(), ConfigError> {
    let side = BOARD_MIN_SIDE..=BOARD_MAX_SIDE;
    if !side.contains(&width) {
        return Err(ConfigError::WidthOutOfRange(width));
    }
    if !side.contains(&height) {
        return Err(ConfigError::HeightOutOfRange(height));
    }
    Ok(())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_board_limits() {
        assert_eq!(check_board_size(32, 256), Ok(()));
        assert_eq!(check_board_size(31, 64), Err(ConfigError::WidthOutOfRange(31)));
        assert_eq!(check_board_size(64, 257), Err(ConfigError::HeightOutOfRange(257)));
    }

    #[test]
    fn test_player_limits() {
        let mut config = GameConfig::default();
        config.max_players = 0;
        assert_eq!(config.validate(), Err(ConfigError::MaxPlayersOutOfRange(0)));
        config.max_players = MAX_PLAYER_SLOTS + 1;
        assert!(config.validate().is_err());
        config.max_players = MAX_PLAYER_SLOTS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_tick_rejected() {
        let config = GameConfig {
            tick_interval: Duration::ZERO,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));
    }
}
