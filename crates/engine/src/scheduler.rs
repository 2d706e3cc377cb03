// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drain scheduler
//!
//! One background task receives drain tickets in creation order and starts
//! a drain task for each context that is still pending. Drain tasks are not
//! awaited; they run concurrently with each other and with new raises.

use crate::drain;
use crate::objection::Inner;
use crate::Objection;
use objection_core::ContextKey;
use std::sync::Weak;
use tokio::sync::mpsc;

/// A context handed off by a drop that reached zero
pub(crate) struct DrainTicket {
    objection: Weak<Inner>,
    key: ContextKey,
}

impl DrainTicket {
    pub(crate) fn new(objection: Weak<Inner>, key: ContextKey) -> Self {
        Self { objection, key }
    }
}

/// Sending half of the scheduler task
#[derive(Clone)]
pub(crate) struct DrainScheduler {
    tx: mpsc::UnboundedSender<DrainTicket>,
}

impl DrainScheduler {
    /// Spawn the background task. Must be called within a tokio runtime.
    ///
    /// The task exits once every handle (and every objection) is dropped.
    pub(crate) fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx));
        Self { tx }
    }

    pub(crate) fn submit(&self, ticket: DrainTicket) {
        if self.tx.send(ticket).is_err() {
            tracing::warn!("drain scheduler stopped, drain will not run");
        }
    }
}

async fn run(mut rx: mpsc::UnboundedReceiver<DrainTicket>) {
    tracing::debug!("drain scheduler started");

    while let Some(ticket) = rx.recv().await {
        let Some(inner) = ticket.objection.upgrade() else {
            continue;
        };
        let objection = Objection::from_inner(inner);

        let Some(snapshot) = objection.start_drain(ticket.key) else {
            tracing::trace!(objection = objection.name(), key = %ticket.key, "skipping cancelled drain");
            continue;
        };

        tracing::trace!(
            objection = objection.name(),
            owner = snapshot.owner.name(),
            key = %ticket.key,
            "starting drain"
        );
        tokio::spawn(drain::run(objection, ticket.key, snapshot));
    }

    tracing::debug!("drain scheduler stopped");
}
