//! Configuration module for update-gate

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::theme::Theme;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Selected theme
    #[serde(default)]
    pub theme: Theme,

    /// Name shown in the notice ("A new version of <app> is available.")
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Page opened by the "Manually Download" action
    #[serde(default = "default_download_page_url")]
    pub download_page_url: String,

    /// Input poll interval of the UI loop in milliseconds
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Behaviour of the simulated update service
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Settings for [`crate::bridge::SimulatedBridge`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Version reported as running
    pub current_version: String,
    /// Version reported as published
    pub latest_version: String,
    /// Latency of the update check
    pub check_delay_ms: u64,
    /// Reject the check with this message
    pub check_error: Option<String>,
    /// Also send the explicit popup trigger after a positive check
    pub emit_popup_trigger: bool,
    /// Size of the simulated download
    pub total_bytes: u64,
    /// Simulated transfer speed
    pub bytes_per_second: u64,
    /// Interval between progress samples
    pub tick_ms: u64,
    /// Number of install attempts that fail before one succeeds
    pub install_failures: u32,
    /// Number of open-download-page attempts that fail before one succeeds
    pub download_page_failures: u32,
    /// Actually open the download page in a browser
    pub open_browser: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            current_version: crate::VERSION.to_string(),
            latest_version: bump_minor(crate::VERSION),
            check_delay_ms: 400,
            check_error: None,
            emit_popup_trigger: false,
            total_bytes: 48 * 1_048_576,
            bytes_per_second: 6 * 1_048_576,
            tick_ms: 250,
            install_failures: 1,
            download_page_failures: 0,
            open_browser: false,
        }
    }
}

fn bump_minor(version: &str) -> String {
    let mut parts = version.split('.').map(|p| p.parse::<u32>().unwrap_or(0));
    let major = parts.next().unwrap_or(0);
    let minor = parts.next().unwrap_or(0);
    format!("{major}.{}.0", minor + 1)
}

fn default_app_name() -> String {
    "update-gate".to_string()
}

fn default_download_page_url() -> String {
    crate::RELEASES_URL.to_string()
}

fn default_tick_rate_ms() -> u64 {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            app_name: default_app_name(),
            download_page_url: default_download_page_url(),
            tick_rate_ms: default_tick_rate_ms(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        crate::paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}
