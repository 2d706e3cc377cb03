// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking on objection events
//!
//! Event sets exist only while someone waits on an owner.

use crate::owner::OwnerRef;
use crate::Objection;
use objection_core::{EventKind, OwnerId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

struct EventSet {
    raised: Arc<Notify>,
    dropped: Arc<Notify>,
    all_dropped: Arc<Notify>,
    waiters: usize,
}

impl EventSet {
    fn new() -> Self {
        Self {
            raised: Arc::new(Notify::new()),
            dropped: Arc::new(Notify::new()),
            all_dropped: Arc::new(Notify::new()),
            waiters: 0,
        }
    }

    fn channel(&self, kind: EventKind) -> &Arc<Notify> {
        match kind {
            EventKind::Raised => &self.raised,
            EventKind::Dropped => &self.dropped,
            EventKind::AllDropped => &self.all_dropped,
        }
    }
}

/// Lazily created event sets, keyed by owner
#[derive(Default)]
pub(crate) struct EventSets {
    sets: HashMap<OwnerId, EventSet>,
}

impl EventSets {
    /// Count a new waiter and hand back the channel to wait on
    pub(crate) fn subscribe(&mut self, owner: &OwnerId, kind: EventKind) -> Arc<Notify> {
        let set = self.sets.entry(owner.clone()).or_insert_with(EventSet::new);
        set.waiters += 1;
        set.channel(kind).clone()
    }

    /// Forget a waiter, discarding the set with the last one
    pub(crate) fn unsubscribe(&mut self, owner: &OwnerId) {
        let Some(set) = self.sets.get_mut(owner) else {
            return;
        };
        set.waiters = set.waiters.saturating_sub(1);
        if set.waiters == 0 {
            self.sets.remove(owner);
        }
    }

    /// Release every current waiter on the owner's channel
    pub(crate) fn signal(&self, owner: &OwnerId, kind: EventKind) {
        if let Some(set) = self.sets.get(owner) {
            set.channel(kind).notify_waiters();
        }
    }

    pub(crate) fn waiters(&self, owner: &OwnerId) -> usize {
        self.sets.get(owner).map_or(0, |s| s.waiters)
    }
}

/// Drops the waiter count even if the wait is abandoned
struct WaitGuard<'a> {
    objection: &'a Objection,
    owner: OwnerId,
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.objection.state().events.unsubscribe(&self.owner);
    }
}

impl Objection {
    /// Suspend until the next `kind` notification for `owner` (the root if
    /// `None`). Every concurrent waiter is released by the same firing.
    pub async fn wait_for(&self, kind: EventKind, owner: Option<&OwnerRef>) {
        let owner = owner.map_or_else(|| self.root().id(), |o| o.id());

        let notify;
        let notified;
        {
            let mut state = self.state();
            notify = state.events.subscribe(&owner, kind);
            // Registered before the lock is released so no firing slips by
            notified = notify.notified();
        }
        let _guard = WaitGuard {
            objection: self,
            owner,
        };

        notified.await;
    }

    /// Tasks currently blocked in `wait_for` on `owner`
    pub fn waiters(&self, owner: &OwnerRef) -> usize {
        self.state().events.waiters(&owner.id())
    }
}
