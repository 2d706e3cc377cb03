// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! objection-core: bookkeeping for hierarchical objections
//!
//! This crate provides:
//! - The per-owner ledger of source and total counts
//! - A generation-checked pool of drain contexts
//! - The drain book enforcing one live drain per owner
//! - Shared event, error and configuration types
//!
//! Nothing here is async; the engine crate drives these types from tasks.

pub mod config;
pub mod drain;
pub mod error;
pub mod event;
pub mod id;
pub mod ledger;
pub mod pool;

pub use config::ObjectionConfig;
pub use drain::DrainBook;
pub use error::{ConfigError, Counter, ObjectionError};
pub use event::{EventKind, ObjectionEvent};
pub use id::OwnerId;
pub use ledger::{Ledger, LedgerEntry};
pub use pool::{ContextKey, ContextPool, DrainContext, DrainPhase, PoolStats};
