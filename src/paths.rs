//! Common paths for update-gate data storage
//!
//! Everything lives under ~/.config/update-gate/ on all platforms:
//! - config.toml - User configuration
//! - update-gate.log - Log output of the terminal UI

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the data directory (~/.config/update-gate/)
pub fn app_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(".config").join("update-gate");
    fs::create_dir_all(&dir).context("Failed to create update-gate directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/update-gate/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(app_dir()?.join("config.toml"))
}

/// Get the log file path (~/.config/update-gate/update-gate.log)
pub fn log_path() -> Result<PathBuf> {
    Ok(app_dir()?.join("update-gate.log"))
}
