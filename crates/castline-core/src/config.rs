//! Configuration system for castline.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $CASTLINE_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/castline/config.toml
//!   3. ~/.config/castline/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastlineConfig {
    pub channels: ChannelConfig,
    pub cast: CastSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Slots in the outbound (transport) queue. 0 is treated as 1.
    pub outbound_capacity: usize,
    /// Slots in the inbound (application) queue. 0 is treated as 1.
    pub inbound_capacity: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastSettings {
    /// Default per-cast deadline in milliseconds. 0 = none.
    pub timeout_ms: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for ChannelConfig {
    fn default() -> Self {
        // One slot: a sender waits until the previous item has been taken.
        Self {
            outbound_capacity: 1,
            inbound_capacity: 1,
        }
    }
}

impl ChannelConfig {
    pub fn outbound(&self) -> usize {
        self.outbound_capacity.max(1)
    }

    pub fn inbound(&self) -> usize {
        self.inbound_capacity.max(1)
    }
}

impl CastSettings {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("castline")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl CastlineConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::file_path())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load a specific file, falling back to defaults if it does not exist.
    /// No env overrides are applied.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("CASTLINE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        Self::write_default_to(&path)?;
        Ok(path)
    }

    fn write_default_to(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))?;
        }
        let text = toml::to_string_pretty(&CastlineConfig::default())
            .map_err(ConfigError::SerializeFailed)?;
        std::fs::write(path, text).map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))
    }

    /// Apply CASTLINE_* overrides read through `lookup`. Unparseable values
    /// are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(n) = lookup("CASTLINE_CHANNELS__OUTBOUND_CAPACITY").and_then(|v| v.parse().ok())
        {
            self.channels.outbound_capacity = n;
        }
        if let Some(n) = lookup("CASTLINE_CHANNELS__INBOUND_CAPACITY").and_then(|v| v.parse().ok())
        {
            self.channels.inbound_capacity = n;
        }
        if let Some(ms) = lookup("CASTLINE_CAST__TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.cast.timeout_ms = ms;
        }
    }
}
