//! SurfsUp configuration.
//!
//! Loaded from a TOML file (`--config`, or `config.toml` in the platform
//! config directory), then overridden from `SURFSUP_*` environment
//! variables. Every field has a default, so running without any file works
//! against `Resources/hawaii.sqlite` on `127.0.0.1:5000`.

use crate::window::DEFAULT_WINDOW_DAYS;
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Station whose observations the tobs route reports unless configured otherwise.
pub const DEFAULT_OBSERVATION_STATION: &str = "USC00519281";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Requests still running after this many seconds get a 408.
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// SQLite file holding the `measurement` and `station` tables.
    pub db_path: String,
    pub observation_station: String,
    /// Length of the trailing window used by the precipitation and tobs routes.
    pub window_days: u32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            db_path: "Resources/hawaii.sqlite".to_string(),
            observation_station: DEFAULT_OBSERVATION_STATION.to_string(),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl DatasetConfig {
    /// `db_path` with `~` and `$VAR` expanded.
    pub fn resolved_db_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::full(&self.db_path).map_or_else(
            |_| self.db_path.clone(),
            |expanded| expanded.into_owned(),
        ))
    }
}

impl Config {
    /// Load configuration from `explicit` (which must exist) or from the
    /// default location (which may be absent), then apply env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML, warning about (not rejecting) keys this version does not know.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let deserializer = toml::Deserializer::parse(raw)?;
        let mut unknown = Vec::new();
        let config: Self = serde_ignored::deserialize(deserializer, |path| {
            unknown.push(path.to_string());
        })?;

        for key in &unknown {
            tracing::warn!("Ignoring unknown config key: {key}");
        }
        Ok(config)
    }

    /// Apply `SURFSUP_*` overrides. `lookup` abstracts the environment for tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = lookup("SURFSUP_DB_PATH").filter(|v| !v.is_empty()) {
            self.dataset.db_path = db_path;
        }
        if let Some(host) = lookup("SURFSUP_HOST").filter(|v| !v.is_empty()) {
            self.gateway.host = host;
        }
        if let Some(port) = lookup("SURFSUP_PORT").filter(|v| !v.is_empty()) {
            self.gateway.port = port
                .trim()
                .parse()
                .with_context(|| format!("SURFSUP_PORT is not a valid port: {port}"))?;
        }
        if let Some(station) = lookup("SURFSUP_OBSERVATION_STATION").filter(|v| !v.is_empty()) {
            self.dataset.observation_station = station;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.gateway.port == 0 {
            bail!("gateway.port must be non-zero");
        }
        if self.dataset.window_days == 0 {
            bail!("dataset.window_days must be greater than zero");
        }
        if self.dataset.observation_station.trim().is_empty() {
            bail!("dataset.observation_station must not be empty");
        }
        Ok(())
    }
}

/// `<platform config dir>/surfsup/config.toml`, if a home directory can be resolved.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "surfsup").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
