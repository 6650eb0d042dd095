mod config;
pub mod database;
mod memory;

pub use config::{AnalyticsConfig, Config, FocusConfig, LoggingConfig};
pub use database::Database;
pub use memory::MemorySessionStore;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the FocusGuard data directory, creating it if needed.
///
/// `FOCUSGUARD_DATA_DIR` wins when set. Otherwise `~/.config/focusguard[-dev]/`
/// based on `FOCUSGUARD_ENV` (set it to `dev` for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSGUARD_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSGUARD_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusguard-dev")
            } else {
                base_dir.join("focusguard")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
