// src/config.rs

//! Manages crate configuration: loading from TOML and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;

/// Configuration for the WebSocket layer core.
///
/// All fields have defaults, so an empty TOML file is a valid configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// The tracing filter the host application should install.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// If true, the first listener failure aborts event delivery and is
    /// returned to the publisher. The default isolates listener failures.
    #[serde(default)]
    pub fail_fast_dispatch: bool,

    /// The maximum number of paths one session may bind. `0` disables the
    /// limit.
    #[serde(default)]
    pub max_paths_per_session: usize,

    /// The opaque source label stamped on every published event.
    #[serde(default = "default_event_source")]
    pub event_source: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_event_source() -> String {
    "examsock".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            fail_fast_dispatch: false,
            max_paths_per_session: 0,
            event_source: default_event_source(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values that cannot be used at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.event_source.is_empty() {
            return Err(anyhow!("event_source must not be empty"));
        }
        if self.log_level.is_empty() {
            return Err(anyhow!("log_level must not be empty"));
        }
        Ok(())
    }
}
