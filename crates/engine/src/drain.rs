// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drain task
//!
//! Waits out the owner's drain time, fires all-dropped, then continues the
//! drop at the parent. A raise can cancel the drain at any suspension point;
//! the task notices through its context key and stops without propagating.

use crate::owner::OwnerRef;
use crate::Objection;
use objection_core::ContextKey;
use std::time::Duration;

/// What a drain task needs to know, copied out when it starts
pub(crate) struct DrainSnapshot {
    pub(crate) owner: OwnerRef,
    pub(crate) originator: OwnerRef,
    pub(crate) description: String,
    pub(crate) count: u32,
    pub(crate) drain_time: Duration,
}

pub(crate) async fn run(objection: Objection, key: ContextKey, snapshot: DrainSnapshot) {
    let owner = snapshot.owner.name();

    if !snapshot.drain_time.is_zero() {
        tokio::time::sleep(snapshot.drain_time).await;
    }
    if !objection.drain_is_live(key) {
        tracing::debug!(objection = objection.name(), owner, "drain cancelled before all-dropped");
        return;
    }

    objection
        .dispatch_all_dropped(
            &snapshot.owner,
            &snapshot.originator,
            &snapshot.description,
            snapshot.count,
        )
        .await;

    match objection.complete_drain(key) {
        Ok(true) => tracing::debug!(objection = objection.name(), owner, "drain complete"),
        Ok(false) => {
            tracing::debug!(objection = objection.name(), owner, "drain cancelled during all-dropped")
        }
        Err(e) => tracing::error!(
            objection = objection.name(),
            owner,
            error = %e,
            "drain could not propagate"
        ),
    }
}
