//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Defaults (this file)
//! 2. Config file (`devis.toml` in the platform config directory)
//! 3. Environment variables (`DEVIS_*`)
//!
//! Later sources override earlier ones, then [`AppConfig::validate`] runs
//! on the merged result.
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use devis_core::validation::{validate_tax_rate, validate_validity_days};
use devis_core::{Money, TaxRate, DEFAULT_TAX_RATE_BPS, DEFAULT_VALIDITY_DAYS};

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "devis.toml";

/// Name of the database file inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "devis.db";

/// Upper bound for the simulated generation delay.
const MAX_GENERATION_DELAY_MS: u64 = 60_000;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Cannot read config file {path}: {reason}")]
    Read { path: String, reason: String },

    /// The config file is not valid TOML for [`AppConfig`].
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A merged value is outside its allowed range.
    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// No platform data directory could be determined.
    #[error("Could not determine the app data directory")]
    NoDataDir,
}

/// Application configuration.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```toml
/// company_name = "Carrelages Martin"
/// default_tax_rate_bps = 2000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Company name printed on quotes.
    pub company_name: String,

    /// Currency symbol used by [`AppConfig::format_currency`].
    pub currency_symbol: String,

    /// Tax rate of new item rows, in basis points (1000 = 10%).
    pub default_tax_rate_bps: u32,

    /// Days a new quote stays valid.
    pub validity_days: i64,

    /// How long a simulated generation takes.
    pub generation_delay_ms: u64,

    /// Explicit database file. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            company_name: "Swift Devis".to_string(),
            currency_symbol: "€".to_string(),
            default_tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            validity_days: DEFAULT_VALIDITY_DAYS,
            generation_delay_ms: 2000,
            database_path: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the platform config file and the process
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = default_config_path();
        Self::load_from(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Loads configuration from an optional file and an environment lookup.
    ///
    /// A missing file is not an error; the defaults are used instead.
    pub fn load_from<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                debug!(path = %path.display(), "Loaded config file");
                Self::from_toml_str(&text)?
            }
            _ => AppConfig::default(),
        };

        config.apply_env(env);
        config.validate()?;
        Ok(config)
    }

    /// Parses a (possibly partial) TOML document over the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies `DEVIS_*` overrides.
    ///
    /// ## Environment Variables
    /// - `DEVIS_DB_PATH`: database file
    /// - `DEVIS_COMPANY_NAME`: company name
    /// - `DEVIS_DEFAULT_TAX_RATE`: percentage, e.g. `"5.5"`
    /// - `DEVIS_VALIDITY_DAYS`: whole days
    /// - `DEVIS_GENERATION_DELAY_MS`: milliseconds
    ///
    /// Unparseable numbers are ignored with a warning.
    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = env("DEVIS_DB_PATH") {
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(name) = env("DEVIS_COMPANY_NAME") {
            self.company_name = name;
        }

        if let Some(raw) = env("DEVIS_DEFAULT_TAX_RATE") {
            match raw.trim().parse::<f64>() {
                Ok(pct) if pct >= 0.0 => {
                    self.default_tax_rate_bps = TaxRate::from_percentage(pct).bps();
                }
                _ => warn!(value = %raw, "Ignoring DEVIS_DEFAULT_TAX_RATE"),
            }
        }

        if let Some(raw) = env("DEVIS_VALIDITY_DAYS") {
            match raw.trim().parse::<i64>() {
                Ok(days) => self.validity_days = days,
                Err(_) => warn!(value = %raw, "Ignoring DEVIS_VALIDITY_DAYS"),
            }
        }

        if let Some(raw) = env("DEVIS_GENERATION_DELAY_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.generation_delay_ms = ms,
                Err(_) => warn!(value = %raw, "Ignoring DEVIS_GENERATION_DELAY_MS"),
            }
        }
    }

    /// Checks the merged values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.company_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "company_name",
                reason: "must not be empty".to_string(),
            });
        }

        validate_tax_rate(self.default_tax_rate()).map_err(|e| ConfigError::Invalid {
            field: "default_tax_rate_bps",
            reason: e.to_string(),
        })?;

        validate_validity_days(self.validity_days).map_err(|e| ConfigError::Invalid {
            field: "validity_days",
            reason: e.to_string(),
        })?;

        if self.generation_delay_ms > MAX_GENERATION_DELAY_MS {
            return Err(ConfigError::Invalid {
                field: "generation_delay_ms",
                reason: format!("must be at most {}", MAX_GENERATION_DELAY_MS),
            });
        }

        Ok(())
    }

    pub fn default_tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.default_tax_rate_bps)
    }

    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }

    /// The configured database file, or `devis.db` in the platform data
    /// directory (created if missing).
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/fr.swift.devis/devis.db`
    /// - **Windows**: `%APPDATA%\swift\devis\data\devis.db`
    /// - **Linux**: `~/.local/share/devis/devis.db`
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|e| ConfigError::Read {
            path: data_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }

    /// Formats an amount for display, e.g. `"93.50 €"`.
    pub fn format_currency(&self, amount: Money) -> String {
        format!("{} {}", amount, self.currency_symbol)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("fr", "swift", "devis")
}

/// `devis.toml` in the platform config directory, if one can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
