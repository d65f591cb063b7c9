mod collection;
mod config;
pub mod database;

pub use collection::{Collection, Named};
pub use config::{CookingDefaults, Config, SignalsConfig, StopwatchConfig, TabataDefaults};
pub use database::Database;

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `TIMERKIT_DATA_DIR` overrides the location entirely. Otherwise this is
/// `~/.config/timerkit`, or `~/.config/timerkit-dev` when `TIMERKIT_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("TIMERKIT_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TIMERKIT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("timerkit-dev")
            } else {
                base_dir.join("timerkit")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
