// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow tunables.
//!
//! Defaults match the deployed policy (one-hour break minimum, 10 m
//! location threshold, 10 s geolocation timeout, 30 s push interval);
//! deployments override them from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors loading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Minimum break length before "end break" is allowed.
    #[serde(with = "secs")]
    pub break_minimum: Duration,
    /// Suppress location pushes closer than this to the last push.
    pub location_threshold_m: f64,
    /// Give up on a geolocation capture after this long.
    #[serde(with = "secs")]
    pub geolocation_timeout: Duration,
    /// Cadence of the automatic location stream.
    #[serde(with = "secs")]
    pub location_interval: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            break_minimum: Duration::from_secs(3600),
            location_threshold_m: 10.0,
            geolocation_timeout: Duration::from_secs(10),
            location_interval: Duration::from_secs(30),
        }
    }
}

impl WorkflowConfig {
    /// Load overrides from a TOML file; missing keys keep defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    crate::setters! {
        set {
            break_minimum: Duration,
            location_threshold_m: f64,
            geolocation_timeout: Duration,
            location_interval: Duration,
        }
    }
}

/// Durations stored as integer seconds in config files.
mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
