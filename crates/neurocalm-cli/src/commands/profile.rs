//! Account profile commands.
//!
//! The profile lives in the `[profile]` config section; edit it with
//! `config set profile.<field> <value>`.

use clap::Subcommand;
use neurocalm_core::Config;
use serde_json::json;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the stored profile
    Show,
    /// Check the stored profile for invalid fields
    Validate,
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        ProfileAction::Show => super::print_json(&config.profile)?,
        ProfileAction::Validate => match config.profile.validate() {
            Ok(()) => super::print_json(&json!({ "valid": true }))?,
            Err(e) => {
                super::print_json(&json!({ "valid": false, "error": e.to_string() }))?;
                std::process::exit(1);
            }
        },
    }
    Ok(())
}
