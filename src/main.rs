//! Headless Columns runner (default binary).
//!
//! Spawns the engine, starts a round, and plays it with a seeded autopilot
//! until the round ends. Every event is logged; the final grid and score are
//! printed to stdout.
//!
//! Environment:
//! - `RUST_LOG`: log filter (default: `info`)
//! - `COLUMNS_AUTOPILOT_MS`: autopilot command interval (default: 120)
//! - the `COLUMNS_*` game and runtime variables

use std::time::Duration;

use anyhow::{bail, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use columns::core::SimpleRng;
use columns::engine::{recv_event, GameHandle, RuntimeConfig};
use columns::types::{GameCommand, GameEvent};

const AUTOPILOT_COMMANDS: [GameCommand; 4] = [
    GameCommand::MoveLeft,
    GameCommand::MoveRight,
    GameCommand::Rotate,
    GameCommand::Drop,
];

fn autopilot_interval() -> Duration {
    let ms = std::env::var("COLUMNS_AUTOPILOT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(120);
    Duration::from_millis(ms)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RuntimeConfig::from_env();
    // Separate stream from the piece queue so the pilot doesn't mirror it.
    let mut pilot = SimpleRng::new(config.game.seed.rotate_left(16) ^ 0x5bd1_e995);

    let handle = GameHandle::spawn(config);
    let mut events = handle.subscribe();
    handle.start_or_toggle().await?;

    let mut ticker = tokio::time::interval(autopilot_interval());
    let last_piece = loop {
        tokio::select! {
            _ = ticker.tick() => {
                let command = AUTOPILOT_COMMANDS[pilot.next_range(AUTOPILOT_COMMANDS.len() as u32) as usize];
                handle.send(command).await?;
            }
            event = recv_event(&mut events) => match event {
                Some(GameEvent::Ended { last_piece }) => break last_piece,
                Some(GameEvent::ScoreChanged { score }) => info!(score, "score changed"),
                Some(event) => debug!(event = event.name(), "{event:?}"),
                None => bail!("game task stopped before the round ended"),
            }
        }
    };

    let snapshot = handle.snapshot().await?;
    for row in snapshot.rows() {
        println!("{row}");
    }
    println!(
        "score {} after {} pieces (round {})",
        snapshot.score, snapshot.pieces_locked, snapshot.round
    );
    info!(?last_piece, "round ended");

    handle.shutdown().await?;
    Ok(())
}
