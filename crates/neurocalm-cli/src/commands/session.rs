//! Timed health session.
//!
//! Streams one JSON event per line: the initial state, the start event,
//! every regenerated reading, then the stop event.

use std::time::Duration;

use clap::Subcommand;
use neurocalm_core::health::HealthDataStore;
use neurocalm_core::{Config, Event, HealthSession};
use tokio::sync::broadcast::error::RecvError;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a session for a fixed number of ticks
    Run {
        /// Regenerations to observe before stopping
        #[arg(long, default_value = "3")]
        ticks: u64,
        /// Tick interval in milliseconds (overrides config)
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Fixed random seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn emit(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        SessionAction::Run {
            ticks,
            interval_ms,
            seed,
        } => {
            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.simulation.tick_interval());
            let store = HealthDataStore::new(super::rng(&config, seed));

            super::runtime()?.block_on(async move {
                let session = HealthSession::start(store, interval);
                let mut events = session.events();
                emit(&session.snapshot_event())?;
                emit(&session.started_event())?;

                let mut seen = 0;
                while seen < ticks {
                    match events.recv().await {
                        Ok(event @ Event::ReadingUpdated { .. }) => {
                            emit(&event)?;
                            seen += 1;
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "output fell behind; readings dropped");
                            seen += skipped;
                        }
                        Err(RecvError::Closed) => break,
                    }
                }

                emit(&session.stop().await)
            })
        }
    }
}
