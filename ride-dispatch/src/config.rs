// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::driver_pool::DEFAULT_DRIVER_CAPACITY;
use crate::error::ConfigError;

/// Everything needed to build a [`Dispatch`](crate::dispatch::Dispatch).
///
/// ```json
/// { "regions": { "North": 3, "Central": 2 }, "log_events": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Region name to the maximum number of simultaneous bookings.
    pub regions: BTreeMap<String, usize>,
    #[serde(default)]
    pub log_events: bool,
    #[serde(default = "default_driver_capacity")]
    pub driver_capacity: usize,
}

fn default_driver_capacity() -> usize {
    DEFAULT_DRIVER_CAPACITY
}

impl DispatchConfig {
    pub fn new<N: Into<String>>(regions: impl IntoIterator<Item = (N, usize)>) -> Self {
        Self {
            regions: regions
                .into_iter()
                .map(|(name, limit)| (name.into(), limit))
                .collect(),
            log_events: false,
            driver_capacity: DEFAULT_DRIVER_CAPACITY,
        }
    }

    pub fn with_log_events(mut self, log_events: bool) -> Self {
        self.log_events = log_events;
        self
    }

    pub fn with_driver_capacity(mut self, driver_capacity: usize) -> Self {
        self.driver_capacity = driver_capacity;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: DispatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }
        for (name, &limit) in &self.regions {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyRegionName);
            }
            if limit == 0 {
                return Err(ConfigError::ZeroCeiling(name.clone()));
            }
        }
        if self.driver_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

/// Parses `NAME=LIMIT`, e.g. `Central=2`.
pub fn parse_region_spec(spec: &str) -> Result<(String, usize), ConfigError> {
    let invalid = || ConfigError::InvalidRegionSpec(spec.to_string());
    let (name, limit) = spec.split_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    let limit: usize = limit.trim().parse().map_err(|_| invalid())?;
    if name.is_empty() {
        return Err(invalid());
    }
    Ok((name.to_string(), limit))
}
