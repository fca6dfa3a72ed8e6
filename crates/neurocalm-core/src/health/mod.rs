mod device;
mod display;
mod generator;
mod random;
mod reading;
mod series;
mod session;
mod store;

pub use device::{placeholder_image, seed_devices, Device, NewDevice};
pub use display::{display_mood_index, mood_fill, BatteryBand, MoodBand};
pub use generator::{fluctuate, next_reading, MAX_STEP_INCREMENT};
pub use random::{
    source_for, RandomSource, ScriptedRandom, SeededRandom, SimulationSeed, ThreadRandom,
};
pub use reading::{BloodPressure, HealthReading, SleepQuality, StressLevel};
pub use series::{
    emotion_breakdown, ChartPoint, EegSeries, EmotionShare, VitalKind, VitalSeries, WaveType,
    EEG_SPACING_MS, EEG_WINDOW, VITAL_SPACING_MS, VITAL_WINDOW,
};
pub use session::{HealthDataHandle, HealthSession, DEFAULT_TICK_INTERVAL};
pub use store::{HealthDataStore, StoreSnapshot};
