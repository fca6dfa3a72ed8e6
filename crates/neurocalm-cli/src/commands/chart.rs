use chrono::Utc;
use clap::Subcommand;
use neurocalm_core::health::{
    emotion_breakdown, EegSeries, VitalKind, VitalSeries, WaveType, EEG_SPACING_MS,
};
use neurocalm_core::Config;
use serde::de::DeserializeOwned;
use serde_json::json;

#[derive(Subcommand)]
pub enum ChartAction {
    /// Rolling vital-sign windows
    Vitals {
        /// heart-rate, systolic or spo2 (all when omitted)
        #[arg(long, value_parser = parse_name::<VitalKind>)]
        kind: Option<VitalKind>,
        /// Fixed random seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// EEG trace
    Eeg {
        /// alpha, beta, theta or delta
        #[arg(long, default_value = "alpha", value_parser = parse_name::<WaveType>)]
        wave: WaveType,
        /// Extra samples to shift in at the chosen wave frequency
        #[arg(long, default_value = "0")]
        samples: u32,
        /// Fixed random seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Predicted emotional-state breakdown
    Emotions,
}

/// Parse a value by its serialized name.
fn parse_name<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|e| e.to_string())
}

pub fn run(action: ChartAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let now_ms = Utc::now().timestamp_millis();

    match action {
        ChartAction::Vitals { kind, seed } => {
            let mut rng = super::rng(&config, seed);
            let kinds = match kind {
                Some(kind) => vec![kind],
                None => VitalKind::ALL.to_vec(),
            };
            let charts: Vec<_> = kinds
                .into_iter()
                .map(|kind| {
                    let series = VitalSeries::seeded(kind, now_ms, rng.as_mut());
                    json!({
                        "kind": kind,
                        "title": kind.title(),
                        "points": series.points().collect::<Vec<_>>(),
                    })
                })
                .collect();
            super::print_json(&charts)?;
        }
        ChartAction::Eeg {
            wave,
            samples,
            seed,
        } => {
            let mut rng = super::rng(&config, seed);
            let mut series = EegSeries::seeded(now_ms, rng.as_mut());
            for i in 0..i64::from(samples) {
                series.push(now_ms + i * EEG_SPACING_MS, wave, rng.as_mut());
            }
            super::print_json(&json!({
                "wave": wave,
                "points": series.points().collect::<Vec<_>>(),
            }))?;
        }
        ChartAction::Emotions => {
            super::print_json(&emotion_breakdown())?;
        }
    }
    Ok(())
}
