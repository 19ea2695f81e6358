//! Configuration file handling.
//!
//! This module provides loading and saving of software-audit configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/software-audit/config.toml`
//! - macOS: `~/Library/Application Support/software-audit/config.toml`
//! - Windows: `%APPDATA%\software-audit\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! default_formats = ["csv", "json"]
//! output_dir = "/var/lib/software-audit/reports"
//! store_snapshots = true
//! database_path = "/var/lib/software-audit/inventory.sqlite"
//! log_filter = "software_audit=info"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::output::ExportFormat;
use crate::platform;

/// Application configuration.
///
/// Nothing here changes which collectors run; that is decided by the
/// operating system alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reports written when `scan` is given no format flag.
    ///
    /// Default: `["csv"]`
    pub default_formats: Vec<ExportFormat>,

    /// Directory that receives `report.csv` / `report.json`.
    ///
    /// Default: the current directory
    pub output_dir: PathBuf,

    /// Whether each scan replaces the host's stored snapshot and database rows.
    ///
    /// Default: true
    pub store_snapshots: bool,

    /// SQLite inventory database.
    ///
    /// Default: `software_audit.sqlite` in the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// `tracing` filter used when `RUST_LOG` is not set.
    ///
    /// Default: "warn"
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_formats: vec![ExportFormat::Csv],
            output_dir: PathBuf::from("."),
            store_snapshots: true,
            database_path: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`, or defaults when it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {:?}", path))
    }

    /// Like [`Config::load`], but an unreadable or invalid file yields the
    /// defaults together with the error so the caller can report it.
    pub fn load_lenient() -> (Self, Option<anyhow::Error>) {
        Self::load_lenient_from(&Self::config_path())
    }

    pub fn load_lenient_from(path: &Path) -> (Self, Option<anyhow::Error>) {
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// The database path to use: the configured one or the platform default.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(platform::database_path)
    }

    /// Parses configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("software-audit")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
