pub mod config;
pub mod database;
pub mod migrations;

pub use config::Config;
pub use database::Database;

use std::path::PathBuf;

use crate::error::CoreError;

/// Returns `~/.config/trailhead[-dev]/` based on TRAILHEAD_ENV.
///
/// Set TRAILHEAD_ENV=dev to use the development data directory, or
/// TRAILHEAD_DATA_DIR to point at an explicit directory (used by tests).
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let dir = if let Ok(explicit) = std::env::var("TRAILHEAD_DATA_DIR") {
        PathBuf::from(explicit)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("TRAILHEAD_ENV").unwrap_or_else(|_| "production".to_string());

        if env == "dev" {
            base_dir.join("trailhead-dev")
        } else {
            base_dir.join("trailhead")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
