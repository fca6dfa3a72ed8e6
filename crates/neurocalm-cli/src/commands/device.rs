//! Device registry commands.
//!
//! Each invocation works on a fresh registry; changes are reported, not
//! persisted.

use std::time::Duration;

use clap::Subcommand;
use neurocalm_core::health::{placeholder_image, BatteryBand, Device, HealthDataStore};
use neurocalm_core::{Config, HealthSession, NewDevice};
use serde_json::json;

#[derive(Subcommand)]
pub enum DeviceAction {
    /// List registered devices
    List,
    /// Flip a device between connected and not connected
    Toggle {
        /// Device ID (e.g. "hrm")
        id: String,
    },
    /// Search for a device and register it once found
    Add {
        /// Device ID
        id: String,
        /// Display name
        name: String,
        /// Image URL (defaults to a placeholder keyed by the ID)
        #[arg(long)]
        image_url: Option<String>,
        /// Simulated search time in milliseconds (overrides config)
        #[arg(long)]
        discovery_ms: Option<u64>,
    },
}

fn listing(devices: &[Device]) -> serde_json::Value {
    devices
        .iter()
        .map(|d| {
            json!({
                "device": d,
                "status": d.status_label(),
                "battery": BatteryBand::for_device(d),
            })
        })
        .collect()
}

pub fn run(action: DeviceAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        DeviceAction::List => {
            let store = super::store(&config, None, 0);
            super::print_json(&listing(store.devices()))?;
        }
        DeviceAction::Toggle { id } => {
            let mut store = super::store(&config, None, 0);
            match store.toggle_device_connection(&id) {
                Some(event) => super::print_json(&event)?,
                None => eprintln!("no device with id '{id}'; registry unchanged"),
            }
            super::print_json(&listing(store.devices()))?;
        }
        DeviceAction::Add {
            id,
            name,
            image_url,
            discovery_ms,
        } => {
            let delay = discovery_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.simulation.discovery_delay());
            let image_url = image_url.unwrap_or_else(|| placeholder_image(&id));
            let device = NewDevice::new(id.clone(), name, image_url);
            let store = HealthDataStore::new(super::rng(&config, None));

            let outcome = super::runtime()?.block_on(async {
                let session = HealthSession::start(store, config.simulation.tick_interval());
                let handle = session.handle();
                eprintln!("searching for '{id}'...");
                let event = handle.discover_device(device, delay).await?;
                let devices = handle.devices();
                session.stop().await;
                Ok::<_, neurocalm_core::CoreError>((event, devices))
            });
            let (event, devices) = outcome?;

            match event {
                Some(event) => super::print_json(&event)?,
                None => eprintln!("device '{id}' is already registered"),
            }
            super::print_json(&listing(&devices))?;
        }
    }
    Ok(())
}
