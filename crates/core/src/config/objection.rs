// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Objection configuration
//!
//! Read once when an objection is created. The trace flag normally comes from
//! the command line; the drain time is the default for owners that never had
//! one set explicitly.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Objection configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectionConfig {
    /// Name identifying this objection in logs and dumps
    pub name: String,
    /// Emit a trace line for every raise, drop and all-dropped
    pub trace: bool,
    /// Drain time for owners without an explicit one
    #[serde(with = "humantime_serde")]
    pub drain_time: Duration,
}

impl ObjectionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_drain_time(mut self, drain_time: Duration) -> Self {
        self.drain_time = drain_time;
        self
    }

    /// Parse a config from a TOML document
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

impl Default for ObjectionConfig {
    fn default() -> Self {
        Self {
            name: "objection".to_string(),
            trace: false,
            drain_time: Duration::ZERO,
        }
    }
}

#[cfg(test)]
#[path = "objection_tests.rs"]
mod tests;
