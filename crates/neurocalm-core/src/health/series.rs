//! Rolling chart feeds for the vitals and EEG views.
//!
//! These are independent of the store: each view keeps its own fixed-size
//! window and shifts it on its own cadence.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::generator::fluctuate;
use super::random::RandomSource;

/// Samples kept per vital chart.
pub const VITAL_WINDOW: usize = 10;
/// Spacing of vital samples.
pub const VITAL_SPACING_MS: i64 = 5000;
/// Samples kept in the EEG trace.
pub const EEG_WINDOW: usize = 50;
/// Spacing of EEG samples.
pub const EEG_SPACING_MS: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Epoch milliseconds.
    pub time: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VitalKind {
    HeartRate,
    Systolic,
    Spo2,
}

impl VitalKind {
    pub const ALL: [VitalKind; 3] = [VitalKind::HeartRate, VitalKind::Systolic, VitalKind::Spo2];

    /// `(base, range)` the chart jitters around.
    pub fn band(&self) -> (f64, f64) {
        match self {
            VitalKind::HeartRate => (75.0, 20.0),
            VitalKind::Systolic => (120.0, 10.0),
            VitalKind::Spo2 => (98.0, 2.0),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            VitalKind::HeartRate => "Heart Rate (BPM)",
            VitalKind::Systolic => "Blood Pressure (Systolic)",
            VitalKind::Spo2 => "Oxygen Saturation (SpO2)",
        }
    }
}

/// Sliding window of one vital sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalSeries {
    pub kind: VitalKind,
    points: VecDeque<ChartPoint>,
}

impl VitalSeries {
    /// Back-fill a full window ending one spacing before `now_ms`.
    pub fn seeded(kind: VitalKind, now_ms: i64, rng: &mut dyn RandomSource) -> Self {
        let (base, range) = kind.band();
        let points = (1..=VITAL_WINDOW as i64)
            .rev()
            .map(|i| ChartPoint {
                time: now_ms - i * VITAL_SPACING_MS,
                value: f64::from(fluctuate(base, range, rng)),
            })
            .collect();
        Self { kind, points }
    }

    /// Drop the oldest sample and append a fresh one at `now_ms`.
    pub fn push(&mut self, now_ms: i64, rng: &mut dyn RandomSource) {
        let (base, range) = self.kind.band();
        self.points.pop_front();
        self.points.push_back(ChartPoint {
            time: now_ms,
            value: f64::from(fluctuate(base, range, rng)),
        });
    }

    pub fn points(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveType {
    Alpha,
    Beta,
    Theta,
    Delta,
}

impl WaveType {
    /// Divisor applied to the sample index before `sin`.
    pub fn frequency(&self) -> f64 {
        match self {
            WaveType::Alpha => 5.0,
            WaveType::Beta => 2.0,
            WaveType::Theta => 8.0,
            WaveType::Delta => 12.0,
        }
    }
}

fn eeg_value(i: f64, freq: f64, rng: &mut dyn RandomSource) -> f64 {
    (i / freq).sin() * 20.0 + (rng.next_unit() - 0.5) * 10.0
}

/// Sliding EEG trace in microvolts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EegSeries {
    points: VecDeque<ChartPoint>,
}

impl EegSeries {
    /// Back-fill a full window at alpha frequency ending one spacing before
    /// `now_ms`.
    pub fn seeded(now_ms: i64, rng: &mut dyn RandomSource) -> Self {
        let freq = WaveType::Alpha.frequency();
        let points = (1..=EEG_WINDOW as i64)
            .rev()
            .map(|i| ChartPoint {
                time: now_ms - i * EEG_SPACING_MS,
                value: eeg_value(i as f64, freq, rng),
            })
            .collect();
        Self { points }
    }

    pub fn push(&mut self, now_ms: i64, wave: WaveType, rng: &mut dyn RandomSource) {
        let i = now_ms as f64 / EEG_SPACING_MS as f64;
        self.points.pop_front();
        self.points.push_back(ChartPoint {
            time: now_ms,
            value: eeg_value(i, wave.frequency(), rng),
        });
    }

    pub fn points(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Share of one predicted emotional state, in percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionShare {
    pub name: String,
    pub value: u8,
}

/// Fixed interpretation shown next to the EEG trace.
pub fn emotion_breakdown() -> Vec<EmotionShare> {
    [("Calm", 75), ("Stress", 15), ("Anxiety", 8), ("Fatigue", 2)]
        .into_iter()
        .map(|(name, value)| EmotionShare {
            name: name.to_string(),
            value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::random::ScriptedRandom;

    #[test]
    fn vital_series_backfills_full_window() {
        let now = 1_000_000;
        let s = VitalSeries::seeded(VitalKind::HeartRate, now, &mut ScriptedRandom::constant(0.5));
        assert_eq!(s.len(), VITAL_WINDOW);
        let times: Vec<_> = s.points().map(|p| p.time).collect();
        assert_eq!(times.first(), Some(&(now - 50_000)));
        assert_eq!(times.last(), Some(&(now - 5000)));
        assert!(s.points().all(|p| p.value == 75.0));
    }

    #[test]
    fn vital_push_slides_window() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut s = VitalSeries::seeded(VitalKind::Spo2, 50_000, &mut rng);
        s.push(55_000, &mut rng);
        assert_eq!(s.len(), VITAL_WINDOW);
        assert_eq!(s.points().next().unwrap().time, 5_000);
        let last = s.points().last().unwrap();
        assert_eq!(last.time, 55_000);
        assert_eq!(last.value, 97.0);
    }

    #[test]
    fn eeg_series_uses_sine_plus_noise() {
        let s = EegSeries::seeded(10_000, &mut ScriptedRandom::constant(0.5));
        assert_eq!(s.len(), EEG_WINDOW);
        let first = s.points().next().unwrap();
        assert_eq!(first.time, 5_000);
        assert!((first.value - (50.0f64 / 5.0).sin() * 20.0).abs() < 1e-9);
    }

    #[test]
    fn eeg_push_uses_wave_frequency() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut s = EegSeries::seeded(0, &mut rng);
        s.push(1_200, WaveType::Delta, &mut rng);
        let last = s.points().last().unwrap();
        assert!((last.value - (12.0f64 / 12.0).sin() * 20.0).abs() < 1e-9);
        assert_eq!(s.len(), EEG_WINDOW);
    }

    #[test]
    fn breakdown_sums_to_one_hundred() {
        let total: u32 = emotion_breakdown().iter().map(|e| u32::from(e.value)).sum();
        assert_eq!(total, 100);
    }
}
