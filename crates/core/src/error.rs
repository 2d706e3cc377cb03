// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for objection bookkeeping

use crate::id::OwnerId;
use thiserror::Error;

/// Which per-owner counter a drop exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Source,
    Total,
}

impl std::fmt::Display for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Counter::Source => write!(f, "source count"),
            Counter::Total => write!(f, "total count"),
        }
    }
}

/// Errors raised by objection operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObjectionError {
    /// A drop asked for more than was outstanding. Callers treat this as fatal.
    #[error(
        "objection '{objection}' dropped {count} below zero on {owner} \
         ({counter} is {available}, description: '{description}')"
    )]
    Underflow {
        objection: String,
        owner: OwnerId,
        description: String,
        count: u32,
        available: u32,
        counter: Counter,
    },

    /// A raise would push a counter past `u32::MAX`. Nothing is applied.
    #[error(
        "objection '{objection}' raised {count} past the limit on {owner} \
         ({counter} is {outstanding})"
    )]
    Overflow {
        objection: String,
        owner: OwnerId,
        count: u32,
        outstanding: u32,
        counter: Counter,
    },
}

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid objection config: {0}")]
    Parse(#[from] toml::de::Error),
}
