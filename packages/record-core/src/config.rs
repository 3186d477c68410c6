//! Configuration for record assembly and output caching.
//!
//! Supports TOML config files, environment variable overrides, and defaults.

use crate::error::{RecordError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Default output cache capacity (4 MiB).
pub const DEFAULT_CACHE_SIZE: usize = 4 * 1024 * 1024;

/// Configuration for the output cache and record assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Initial output cache capacity in bytes (default: 4 MiB)
    pub cache_size: usize,
    /// Smallest capacity the cache is reallocated to (default: 4 MiB)
    pub min_cache_size: usize,
    /// Buffer records before delivery; `false` delivers each record at once (default: true)
    pub buffered: bool,
    /// Extra bytes reserved when the assembler grows its record buffer (default: 20)
    pub assembler_padding: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            min_cache_size: DEFAULT_CACHE_SIZE,
            buffered: true,
            assembler_padding: 20,
        }
    }
}

impl CacheConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that delivers every record straight to the sink.
    pub fn unbuffered() -> Self {
        Self {
            buffered: false,
            ..Self::default()
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| RecordError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| RecordError::Config(format!("Invalid TOML: {}", e)))
    }

    /// Saves the configuration to a TOML file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| RecordError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path.as_ref(), toml)
            .map_err(|e| RecordError::Config(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }

    /// Applies environment variable overrides.
    /// Environment variables are prefixed with `RECORD_`.
    /// Example: `RECORD_CACHE_SIZE=1048576` overrides `cache_size`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = env::var("RECORD_CACHE_SIZE") {
            self.cache_size = val
                .parse()
                .map_err(|_| RecordError::Config(format!("Invalid cache_size: {}", val)))?;
        }
        if let Ok(val) = env::var("RECORD_MIN_CACHE_SIZE") {
            self.min_cache_size = val
                .parse()
                .map_err(|_| RecordError::Config(format!("Invalid min_cache_size: {}", val)))?;
        }
        if let Ok(val) = env::var("RECORD_BUFFERED") {
            self.buffered = val
                .parse()
                .map_err(|_| RecordError::Config(format!("Invalid buffered: {}", val)))?;
        }
        if let Ok(val) = env::var("RECORD_ASSEMBLER_PADDING") {
            self.assembler_padding = val.parse().map_err(|_| {
                RecordError::Config(format!("Invalid assembler_padding: {}", val))
            })?;
        }
        Ok(())
    }
}
