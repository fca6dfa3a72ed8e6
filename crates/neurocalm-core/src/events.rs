use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health::{Device, HealthReading};

/// Every state change in a health session produces an Event.
/// The CLI prints them as JSON; consumers may log or forward them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        interval_ms: u64,
        at: DateTime<Utc>,
    },
    /// A tick replaced the current reading.
    ReadingUpdated {
        reading: HealthReading,
        at: DateTime<Utc>,
    },
    DeviceToggled {
        device_id: String,
        connected: bool,
        at: DateTime<Utc>,
    },
    DeviceAdded {
        device: Device,
        at: DateTime<Utc>,
    },
    /// The ticker was cancelled; `ticks` is how many regenerations ran.
    SessionStopped {
        ticks: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        reading: HealthReading,
        devices: Vec<Device>,
        at: DateTime<Utc>,
    },
}
