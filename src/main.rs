//! Headless engine host (default binary).
//!
//! Runs the game state machine on a fixed timestep and exposes it to an
//! external presentation layer through the TCP adapter. The host owns
//! the clock: deferred match/mismatch resolutions count down here.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use memory_match::adapter::{
    ack_line, error_line, load_catalog_from_env, observation_line, Adapter,
};
use memory_match::core::GameState;
use memory_match::types::TICK_MS;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let catalog = load_catalog_from_env()?;
    let seed = std::env::var("MEMORY_MATCH_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);

    info!(items = catalog.len(), seed, "starting engine host");

    let Some(mut adapter) = Adapter::start_from_env()? else {
        warn!("adapter disabled via MEMORY_MATCH_DISABLED; nothing to serve");
        return Ok(());
    };

    run(GameState::new(catalog, seed), &mut adapter)
}

fn run(mut game: GameState, adapter: &mut Adapter) -> Result<()> {
    let tick = Duration::from_millis(TICK_MS as u64);
    let started = Instant::now();
    let mut last_tick = Instant::now();
    let mut seq: u64 = 0;
    let mut dirty = true;

    loop {
        let ts = started.elapsed().as_millis() as u64;

        // Drain inbound commands.
        while let Some(cmd) = adapter.try_recv() {
            match game.apply_action(cmd.action) {
                Ok(applied) => {
                    if applied {
                        dirty = true;
                    }
                    if let Ok(line) = ack_line(cmd.seq, ts, applied) {
                        adapter.send_to(cmd.client_id, line);
                    }
                }
                Err(e) => {
                    // Unknown position means a driver bug; reject loudly.
                    warn!(client_id = cmd.client_id, error = %e, "rejected command");
                    if let Ok(line) = error_line(cmd.seq, ts, "unknown_position", e.to_string()) {
                        adapter.send_to(cmd.client_id, line);
                    }
                }
            }
        }

        // Advance the pending-resolution countdown on the fixed timestep.
        if last_tick.elapsed() >= tick {
            let elapsed = last_tick.elapsed().as_millis() as u32;
            last_tick = Instant::now();
            if game.tick(elapsed) {
                dirty = true;
                if game.is_complete() {
                    info!(
                        round = game.round_id(),
                        moves = game.moves(),
                        "round complete"
                    );
                }
            }
        }

        if dirty {
            seq += 1;
            match observation_line(seq, ts, &game.snapshot()) {
                Ok(line) => adapter.broadcast(line),
                Err(e) => warn!(error = %e, "failed to serialize observation"),
            }
            dirty = false;
        }

        // Commands are polled, so sleep well under the tick interval.
        std::thread::sleep(Duration::from_millis(1));
    }
}
