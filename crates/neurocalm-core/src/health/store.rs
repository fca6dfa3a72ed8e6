//! Health data store.
//!
//! The store is a plain state machine. It does not own a timer - the
//! caller (normally a [`HealthSession`](super::HealthSession)) is responsible
//! for calling `tick()` once per period.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = HealthDataStore::new(Box::new(ThreadRandom));
//! store.toggle_device_connection("hrm");
//! // Every period:
//! store.tick(); // Returns Event::ReadingUpdated
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::device::{seed_devices, Device, NewDevice};
use super::generator::next_reading;
use super::random::RandomSource;
use super::reading::HealthReading;
use crate::events::Event;

/// Immutable copy of everything the store holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub reading: HealthReading,
    pub devices: Vec<Device>,
}

/// Latest reading plus the device registry.
pub struct HealthDataStore {
    reading: HealthReading,
    devices: Vec<Device>,
    rng: Box<dyn RandomSource>,
}

impl std::fmt::Debug for HealthDataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthDataStore")
            .field("reading", &self.reading)
            .field("devices", &self.devices)
            .finish_non_exhaustive()
    }
}

impl HealthDataStore {
    /// Create a store seeded with the baseline reading and the default
    /// device list.
    pub fn new(rng: Box<dyn RandomSource>) -> Self {
        Self {
            reading: HealthReading::baseline(),
            devices: seed_devices(),
            rng,
        }
    }

    // Queries

    pub fn reading(&self) -> &HealthReading {
        &self.reading
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            reading: self.reading.clone(),
            devices: self.devices.clone(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            reading: self.reading.clone(),
            devices: self.devices.clone(),
            at: Utc::now(),
        }
    }

    // Commands

    /// Replace the reading with a freshly generated one.
    pub fn tick(&mut self) -> Event {
        let next = next_reading(&self.reading, self.rng.as_mut());
        self.reading = next;
        Event::ReadingUpdated {
            reading: self.reading.clone(),
            at: Utc::now(),
        }
    }

    /// Flip `connected` on the device with `id`. Unknown ids are ignored.
    pub fn toggle_device_connection(&mut self, id: &str) -> Option<Event> {
        let device = self.devices.iter_mut().find(|d| d.id == id)?;
        device.connected = !device.connected;
        Some(Event::DeviceToggled {
            device_id: device.id.clone(),
            connected: device.connected,
            at: Utc::now(),
        })
    }

    /// Append a newly discovered device as connected with a random battery
    /// level. A device whose id is already registered is ignored.
    pub fn add_device(&mut self, new: NewDevice) -> Option<Event> {
        if self.device(&new.id).is_some() {
            return None;
        }
        let battery = self.rng.next_below(100) as u8;
        let device = Device {
            id: new.id,
            name: new.name,
            connected: true,
            battery_level: Some(battery),
            image_url: new.image_url,
        };
        let event = Event::DeviceAdded {
            device: device.clone(),
            at: Utc::now(),
        };
        self.devices.push(device);
        Some(event)
    }
}
