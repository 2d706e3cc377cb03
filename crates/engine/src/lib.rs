// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Objection engine: raise/drop propagation, drains and waits
//!
//! Create an [`ObjectionRegistry`] inside a tokio runtime, then create
//! objections from it. Raises and drops are synchronous; all-dropped
//! notifications arrive from drain tasks spawned by the registry's scheduler.

mod dispatch;
mod drain;
mod objection;
mod owner;
mod registry;
mod scheduler;
mod wait;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use dispatch::{ObjectionObserver, ObserverId};
pub use objection::Objection;
pub use owner::{Node, Owner, OwnerRef};
pub use registry::{ObjectionId, ObjectionRegistry};

pub use objection_core::{EventKind, ObjectionConfig, ObjectionError, ObjectionEvent, OwnerId, PoolStats};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use fake::{HookCall, RecordingObserver, RecordingOwner};
