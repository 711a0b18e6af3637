//! Gridtrail demo binary.
//!
//! Runs a headless game with a scripted keyboard against the JSON store,
//! then prints the final standings.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gridtrail::{
    Direction, GameConfig, GameSession, HeadlessRenderer, JsonFileStore, VERSION,
    game::input::KeyState,
};

/// Frames the demo runs before the "display" closes.
const DEMO_FRAMES: u64 = 480;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let default_level = if cfg!(feature = "debug-tracing") { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Gridtrail v{}", VERSION);

    let config = GameConfig::load_or_default();
    let store = JsonFileStore::open(&config.store_path, config.reset_store)
        .with_context(|| format!("Failed to open player store at {}", config.store_path.display()))?;
    info!("Player store: {}", store.path().display());

    let renderer = HeadlessRenderer::new(Some(DEMO_FRAMES))
        .with_script(demo_script())
        .with_logging(64);

    let names = config.player_names.clone();
    let mut session = GameSession::new(config, Arc::new(store), renderer)?;
    for name in &names {
        if let Err(e) = session.join(name) {
            warn!("Skipping {}: {}", name, e);
        }
    }

    session.run().await;
    session.shutdown().await;

    let state = session.state();
    for player in state.scoreboard.standings(&state.players) {
        info!(
            "#{:<3} {:<16} kills {:>4}  deaths {:>4}",
            player.rank, player.name, player.kills, player.deaths
        );
    }
    info!("Board digest: {}", hex::encode(state.digest()));

    Ok(())
}

/// A slow clockwise spiral with idle frames in between.
fn demo_script() -> Vec<KeyState> {
    let mut script = Vec::new();
    for dir in [Direction::Right, Direction::Down, Direction::Left, Direction::Up] {
        script.push(KeyState::only(dir));
        script.extend(std::iter::repeat(KeyState::NONE).take(11));
    }
    script
}
