// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Default bound on objects carried into one nested scope
pub const DEFAULT_MAX_CARRIED_OBJECTS: usize = 15;

/// Errors loading engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Tunable engine limits and logging policy
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EngineConfig {
    /// Upper bound on objects carried into one nested scope
    pub max_carried_objects: usize,
    /// Log argument values at debug level for non-sensitive calls
    pub log_arguments: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_carried_objects: DEFAULT_MAX_CARRIED_OBJECTS,
            log_arguments: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<EngineConfig, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
