//! Reading regeneration.
//!
//! Each numeric field is jittered independently around a fixed baseline;
//! nothing is clamped here. Display code clamps where it needs to.

use super::random::RandomSource;
use super::reading::{BloodPressure, HealthReading, StressLevel};

/// Upper bound (exclusive) of the per-tick step increment.
pub const MAX_STEP_INCREMENT: u64 = 20;

/// `(base, range)` pairs for each regenerated field.
pub const SYSTOLIC: (f64, f64) = (120.0, 10.0);
pub const DIASTOLIC: (f64, f64) = (80.0, 8.0);
pub const OXYGEN_LEVEL: (f64, f64) = (98.0, 2.0);
pub const HEART_RATE: (f64, f64) = (75.0, 15.0);
pub const MOOD_INDEX: (f64, f64) = (7.0, 4.0);
pub const EMOTIONAL_STABILITY: (f64, f64) = (7.0, 4.0);
pub const SLEEP_RECOVERY: (f64, f64) = (80.0, 20.0);

/// `base + (u - 0.5) * range`, rounded to the nearest integer.
pub fn fluctuate(base: f64, range: f64, rng: &mut dyn RandomSource) -> i32 {
    (base + (rng.next_unit() - 0.5) * range).round() as i32
}

fn jitter((base, range): (f64, f64), rng: &mut dyn RandomSource) -> i32 {
    fluctuate(base, range, rng)
}

/// Build the reading that replaces `prev` on a tick.
///
/// Draw order is fixed: stress level, systolic, diastolic, oxygen, heart
/// rate, step increment, mood, stability, sleep recovery.
pub fn next_reading(prev: &HealthReading, rng: &mut dyn RandomSource) -> HealthReading {
    let idx = rng.next_below(StressLevel::ALL.len() as u64) as usize;
    let stress_level = StressLevel::ALL[idx];

    let blood_pressure = BloodPressure {
        systolic: jitter(SYSTOLIC, rng),
        diastolic: jitter(DIASTOLIC, rng),
    };
    let oxygen_level = jitter(OXYGEN_LEVEL, rng);
    let heart_rate = jitter(HEART_RATE, rng);
    let daily_steps = prev
        .daily_steps
        .saturating_add(rng.next_below(MAX_STEP_INCREMENT));

    HealthReading {
        blood_pressure,
        oxygen_level,
        heart_rate,
        sleep_quality: prev.sleep_quality,
        daily_steps,
        stress_level,
        emotional_state: stress_level.emotional_state().to_string(),
        mood_index: jitter(MOOD_INDEX, rng),
        emotional_stability: jitter(EMOTIONAL_STABILITY, rng),
        sleep_recovery: jitter(SLEEP_RECOVERY, rng),
    }
}
