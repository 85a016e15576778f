//! Prover configuration
//!
//! Stored as JSON at `<config dir>/xelishash/config.json`. A missing file
//! means defaults; command line flags override whatever the file says.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::algorithm::{HASH_SIZE, INPUT_LENGTH};
use crate::work::{DEFAULT_NONCE_OFFSET, NONCE_LEN};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Log levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Lowercase name, as stored in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Settings shared by the `mine`, `verify` and `benchmark` commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// Mining threads, 0 for one per CPU
    pub threads: usize,

    pub log_level: LogLevel,

    /// Required leading zero bits
    pub difficulty: u32,

    /// Byte offset of the little-endian nonce inside the block work
    pub nonce_offset: usize,

    /// Seconds between hashrate reports while mining
    pub report_interval_secs: u64,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            log_level: LogLevel::Info,
            difficulty: 16,
            nonce_offset: DEFAULT_NONCE_OFFSET,
            report_interval_secs: 5,
        }
    }
}

impl ProverConfig {
    /// Load from `path`, or from the default location when `None`
    ///
    /// An explicit path must exist; a missing default file yields the
    /// default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load and validate a JSON config file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nonce_offset > INPUT_LENGTH - NONCE_LEN {
            return Err(ConfigError::Invalid(format!(
                "nonce offset {} leaves no room for an {}-byte nonce in {} bytes of work",
                self.nonce_offset, NONCE_LEN, INPUT_LENGTH
            )));
        }
        if self.difficulty as usize > HASH_SIZE * 8 {
            return Err(ConfigError::Invalid(format!(
                "difficulty {} exceeds {} bits",
                self.difficulty,
                HASH_SIZE * 8
            )));
        }
        Ok(())
    }

    /// Effective thread count
    pub fn thread_count(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

/// Get the default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("xelishash").join("config.json"))
}
