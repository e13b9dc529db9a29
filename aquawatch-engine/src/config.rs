//! # Config Loader — Loads and validates TOML configuration
//!
//! Reads `aquawatch.toml` (or a custom path) and deserializes into typed
//! config structs with per-section defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{EngineError, EngineResult};

/// Top-level aquawatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AquawatchConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl Default for AquawatchConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            engine: EngineConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { log_level: "info".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Interval between simulation ticks
    pub tick_interval_ms: u64,
    /// Days of synthetic history generated at startup
    pub history_days: u32,
    /// Points per synthetic history day
    pub points_per_day: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 60_000,
            history_days: 30,
            points_per_day: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Interval between risk-level checks
    pub check_interval_ms: u64,
    /// Suppress all non-critical notifications
    pub critical_only: bool,
    /// Maximum notifications retained in the in-process store
    pub store_capacity: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 60_000,
            critical_only: false,
            store_capacity: 5_000,
        }
    }
}

impl AquawatchConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EngineError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| EngineError::Config(format!("parse error: {e}")))?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Write the configuration out as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        let raw = toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("serialize error: {e}")))?;
        std::fs::write(path.as_ref(), raw)?;
        Ok(())
    }
}
