pub mod ai;
pub mod chart;
pub mod config;
pub mod device;
pub mod profile;
pub mod reading;
pub mod session;

use neurocalm_core::health::{source_for, HealthDataStore, RandomSource, SimulationSeed};
use neurocalm_core::Config;

/// Single-threaded runtime for commands that wait on timers or the network.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// `--seed` wins over the configured seed.
pub fn rng(config: &Config, seed: Option<u64>) -> Box<dyn RandomSource> {
    source_for(seed.or(config.simulation.seed).map(SimulationSeed))
}

/// Fresh store advanced by `ticks` regenerations.
pub fn store(config: &Config, seed: Option<u64>, ticks: u32) -> HealthDataStore {
    let mut store = HealthDataStore::new(rng(config, seed));
    for _ in 0..ticks {
        store.tick();
    }
    store
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
