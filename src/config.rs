//! Settings persisted between runs: signed-in profile, theme, currency and log level.
//!
//! Stored as `config.json` in the platform config directory, or under `$SPENDWISE_HOME`
//! when that variable is set.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub(crate) const HOME_ENV: &str = "SPENDWISE_HOME";
const CONFIG_JSON: &str = "config.json";
const DB_FILE: &str = "spendwise.db";
const LOG_FILE: &str = "spendwise.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub(crate) fn toggle(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Email of the signed-in profile.
    pub(crate) current_user: Option<String>,
    pub(crate) theme: Theme,
    pub(crate) currency_symbol: String,
    pub(crate) log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            current_user: None,
            theme: Theme::Dark,
            currency_symbol: "₦".into(),
            log_level: "info".into(),
        }
    }
}

/// Resolved file locations plus the loaded settings.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    config_path: PathBuf,
    data_dir: PathBuf,
    pub(crate) settings: Settings,
}

impl Config {
    /// Resolve directories (honoring `$SPENDWISE_HOME`) and load the settings file.
    pub(crate) fn load_default() -> Result<Self> {
        let (config_dir, data_dir) = match std::env::var_os(HOME_ENV) {
            Some(home) if !home.is_empty() => {
                let home = PathBuf::from(home);
                (home.clone(), home)
            }
            _ => {
                let dirs = directories::ProjectDirs::from("com", "spendwise", "Spendwise")
                    .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
                (dirs.config_dir().to_path_buf(), dirs.data_dir().to_path_buf())
            }
        };
        Self::load(&config_dir, &data_dir)
    }

    /// Load `config.json` from `config_dir`. A missing file yields defaults.
    pub(crate) fn load(config_dir: &Path, data_dir: &Path) -> Result<Self> {
        for dir in [config_dir, data_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        let config_path = config_dir.join(CONFIG_JSON);
        let settings = if config_path.is_file() {
            let text = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid config file {}", config_path.display()))?
        } else {
            Settings::default()
        };
        Ok(Self {
            config_path,
            data_dir: data_dir.to_path_buf(),
            settings,
        })
    }

    pub(crate) fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.settings)?;
        std::fs::write(&self.config_path, text)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;
        Ok(())
    }

    pub(crate) fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub(crate) fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
