use serde::{Deserialize, Serialize};

/// Stress classification drawn on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Medium,
    High,
}

impl StressLevel {
    /// Draw order for uniform selection.
    pub const ALL: [StressLevel; 3] = [StressLevel::Low, StressLevel::Medium, StressLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::Low => "low",
            StressLevel::Medium => "medium",
            StressLevel::High => "high",
        }
    }

    /// The emotional-state label a reading carries for this stress level.
    pub fn emotional_state(&self) -> &'static str {
        match self {
            StressLevel::High => "Stressed",
            StressLevel::Medium => "Anxious",
            StressLevel::Low => "Calm",
        }
    }
}

impl std::fmt::Display for StressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepQuality {
    Good,
    Poor,
}

impl SleepQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            SleepQuality::Good => "good",
            SleepQuality::Poor => "poor",
        }
    }
}

impl std::fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: i32,
    pub diastolic: i32,
}

impl std::fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// One complete simulated biometric snapshot.
///
/// Readings are values: the store replaces the whole struct on every tick and
/// never edits a field of a published reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReading {
    pub blood_pressure: BloodPressure,
    pub oxygen_level: i32,
    pub heart_rate: i32,
    pub sleep_quality: SleepQuality,
    pub daily_steps: u64,
    pub stress_level: StressLevel,
    pub emotional_state: String,
    pub mood_index: i32,
    pub emotional_stability: i32,
    pub sleep_recovery: i32,
}

impl HealthReading {
    /// Fixed values every session starts from.
    pub fn baseline() -> Self {
        Self {
            blood_pressure: BloodPressure {
                systolic: 120,
                diastolic: 80,
            },
            oxygen_level: 98,
            heart_rate: 75,
            sleep_quality: SleepQuality::Good,
            daily_steps: 5000,
            stress_level: StressLevel::Low,
            emotional_state: StressLevel::Low.emotional_state().to_string(),
            mood_index: 8,
            emotional_stability: 7,
            sleep_recovery: 85,
        }
    }

    /// Activity line forwarded to the AI flows.
    pub fn daily_activity(&self) -> String {
        format!("Completed {} steps.", self.daily_steps)
    }
}
