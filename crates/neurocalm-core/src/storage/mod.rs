mod config;

pub use config::{AiConfig, AssistantConfig, Config, SimulationConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/neurocalm[-dev]/` based on NEUROCALM_ENV.
///
/// Set NEUROCALM_ENV=dev to use development data directory.
/// NEUROCALM_HOME overrides the location entirely.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("NEUROCALM_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("NEUROCALM_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("neurocalm-dev")
            } else {
                base_dir.join("neurocalm")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
