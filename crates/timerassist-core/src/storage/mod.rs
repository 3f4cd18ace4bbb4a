mod config;

pub use config::Config;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Overrides the data directory outright. Tests point it at a temp dir.
pub const DATA_DIR_ENV: &str = "TIMERASSIST_DATA_DIR";

/// `dev` selects the development data directory.
pub const PROFILE_ENV: &str = "TIMERASSIST_ENV";

/// Returns `$TIMERASSIST_DATA_DIR`, or `~/.config/timerassist[-dev]/` based on
/// `TIMERASSIST_ENV`, creating it if needed.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var(PROFILE_ENV).unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("timerassist-dev")
            } else {
                base_dir.join("timerassist")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
