//! Configuration management for the design logger
//!
//! TOML file at ~/.designlogger/config.toml, created with defaults on
//! first load.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Survey opened when a session ends
pub const DEFAULT_SURVEY_URL: &str = "https://goo.gl/forms/JaaCTzpEnsi6MTNL2";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// How the session length is enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingMode {
    /// Host supplies the section; the user ends the session
    #[default]
    Manual,
    /// A session-length timer forces the end
    Automatic,
}

/// What gets pushed onto the favorites list when a design is marked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteCapture {
    /// The design vector of the marking invocation
    #[default]
    DesignVector,
    /// An empty vector in place of the design vector, as when the
    /// favorite was taken from a per-call buffer already cleared
    LegacyEmpty,
}

/// Which columns the CSV carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsvLayout {
    /// dv..., ov..., timestamp, elapsed, favorite, section
    #[default]
    Full,
    /// dv..., ov..., timestamp, favorite
    Compact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub autosave_interval_secs: u64,
    /// Used when an invocation omits `session_length_minutes`
    pub default_length_minutes: f64,
    pub timing: TimingMode,
    pub favorite_capture: FavoriteCapture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub layout: CsvLayout,
    /// Empty disables the browser launch
    pub survey_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: 60,
            default_length_minutes: 0.5,
            timing: TimingMode::Manual,
            favorite_capture: FavoriteCapture::DesignVector,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            layout: CsvLayout::Full,
            survey_url: DEFAULT_SURVEY_URL.to_string(),
        }
    }
}

impl LoggerConfig {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = LoggerConfig::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: LoggerConfig =
            toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;

        Ok(home.join(".designlogger").join("config.toml"))
    }

    pub fn autosave_interval(&self) -> Duration {
        // tokio's interval panics on a zero period
        Duration::from_secs(self.session.autosave_interval_secs.max(1))
    }

    pub fn survey_url(&self) -> Option<&str> {
        let url = self.export.survey_url.trim();
        (!url.is_empty()).then_some(url)
    }
}
