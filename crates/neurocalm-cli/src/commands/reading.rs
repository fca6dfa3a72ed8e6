use clap::Subcommand;
use neurocalm_core::health::{display_mood_index, MoodBand};
use neurocalm_core::Config;
use serde_json::json;

#[derive(Subcommand)]
pub enum ReadingAction {
    /// Print the current reading as JSON
    Show {
        /// Regenerations to apply before printing
        #[arg(long, default_value = "0")]
        ticks: u32,
        /// Fixed random seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub fn run(action: ReadingAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        ReadingAction::Show { ticks, seed } => {
            let store = super::store(&config, seed, ticks);
            let reading = store.reading();
            super::print_json(&json!({
                "reading": reading,
                "dailyActivity": reading.daily_activity(),
                "displayMoodIndex": display_mood_index(reading.mood_index),
                "moodBand": MoodBand::for_index(reading.mood_index),
            }))?;
        }
    }
    Ok(())
}
