use serde::{Deserialize, Serialize};

const IMAGE_BASE_URL: &str = "https://picsum.photos/seed";

/// Resolve a placeholder asset key to its image URL.
pub fn placeholder_image(key: &str) -> String {
    format!("{IMAGE_BASE_URL}/{key}/40/40")
}

/// A mock wearable device in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<u8>,
    pub image_url: String,
}

impl Device {
    pub fn status_label(&self) -> &'static str {
        if self.connected {
            "Connected"
        } else {
            "Not Connected"
        }
    }
}

/// Descriptor for a newly discovered device. Connection and battery state
/// are assigned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    pub id: String,
    pub name: String,
    pub image_url: String,
}

impl NewDevice {
    pub fn new(id: impl Into<String>, name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: image_url.into(),
        }
    }
}

fn seed(id: &str, name: &str, connected: bool, battery: Option<u8>, asset: &str) -> Device {
    Device {
        id: id.to_string(),
        name: name.to_string(),
        connected,
        battery_level: battery,
        image_url: placeholder_image(asset),
    }
}

/// The registry every session starts with.
pub fn seed_devices() -> Vec<Device> {
    vec![
        seed("eeg", "EEG Headset", true, Some(88), "eeg_headset"),
        seed("watch", "Smartwatch", true, Some(62), "smartwatch"),
        seed("hrm", "Heart Rate Monitor", false, None, "heart_rate_monitor"),
        seed("sring", "Smart Ring", true, Some(21), "smart_ring"),
        seed("oring", "Oura Ring", false, None, "oura_ring"),
        seed("fitbit", "Fitbit Sense", true, Some(95), "fitbit"),
        seed("gfit", "Google Fit", false, None, "google_fit"),
        seed("ahealth", "Apple Health", true, Some(100), "apple_health"),
    ]
}
