//! Presentation helpers shared by every front-end.

use serde::{Deserialize, Serialize};

use super::device::Device;

pub const MOOD_MIN: i32 = 0;
pub const MOOD_MAX: i32 = 10;

/// Mood index as shown to the user. The generator does not clamp.
pub fn display_mood_index(mood_index: i32) -> i32 {
    mood_index.clamp(MOOD_MIN, MOOD_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodBand {
    Excellent,
    Good,
    Fair,
    Low,
}

impl MoodBand {
    pub fn for_index(mood_index: i32) -> Self {
        match display_mood_index(mood_index) {
            i if i > 7 => MoodBand::Excellent,
            i if i > 4 => MoodBand::Good,
            i if i > 2 => MoodBand::Fair,
            _ => MoodBand::Low,
        }
    }
}

/// Fraction of the mood ring to fill, 0.0 ..= 1.0.
pub fn mood_fill(mood_index: i32) -> f64 {
    f64::from(display_mood_index(mood_index)) / f64::from(MOOD_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryBand {
    Full,
    Medium,
    Low,
}

impl BatteryBand {
    /// Band for a device, or `None` when it is disconnected or reports no
    /// battery.
    pub fn for_device(device: &Device) -> Option<Self> {
        if !device.connected {
            return None;
        }
        Some(match device.battery_level? {
            b if b > 75 => BatteryBand::Full,
            b if b > 25 => BatteryBand::Medium,
            _ => BatteryBand::Low,
        })
    }
}
