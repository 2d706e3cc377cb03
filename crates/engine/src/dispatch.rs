// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification dispatch
//!
//! Every notification goes to the owner's own hook first, then to matching
//! observers in registration order, then to anyone blocked in `wait_for`.

use crate::owner::OwnerRef;
use crate::Objection;
use async_trait::async_trait;
use objection_core::{EventKind, OwnerId};
use std::sync::Arc;

/// External listener for an objection's notifications
///
/// Notifications for one call are delivered after its ledger updates are
/// complete, in the same order as the owner hooks.
#[async_trait]
pub trait ObjectionObserver: Send + Sync {
    fn raised(
        &self,
        _objection: &Objection,
        _owner: &OwnerRef,
        _originator: &OwnerRef,
        _description: &str,
        _count: u32,
    ) {
    }

    fn dropped(
        &self,
        _objection: &Objection,
        _owner: &OwnerRef,
        _originator: &OwnerRef,
        _description: &str,
        _count: u32,
    ) {
    }

    async fn all_dropped(
        &self,
        _objection: &Objection,
        _owner: &OwnerRef,
        _originator: &OwnerRef,
        _description: &str,
        _count: u32,
    ) {
    }
}

/// Handle returned by `add_observer`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct ObserverEntry {
    id: ObserverId,
    /// `None` observes every owner
    scope: Option<OwnerId>,
    observer: Arc<dyn ObjectionObserver>,
}

/// Registered observers, in insertion order
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<ObserverEntry>,
}

impl Observers {
    pub(crate) fn add(
        &mut self,
        scope: Option<OwnerId>,
        observer: Arc<dyn ObjectionObserver>,
    ) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push(ObserverEntry {
            id,
            scope,
            observer,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Observers interested in `owner`
    pub(crate) fn matching(&self, owner: &OwnerId) -> Vec<Arc<dyn ObjectionObserver>> {
        self.entries
            .iter()
            .filter(|e| e.scope.is_none() || e.scope.as_ref() == Some(owner))
            .map(|e| e.observer.clone())
            .collect()
    }
}

/// A raised/dropped notification collected during a walk
pub(crate) struct Notification {
    kind: EventKind,
    owner: OwnerRef,
    originator: OwnerRef,
    description: String,
    count: u32,
}

impl Notification {
    pub(crate) fn new(
        kind: EventKind,
        owner: &OwnerRef,
        originator: &OwnerRef,
        description: &str,
        count: u32,
    ) -> Self {
        Self {
            kind,
            owner: owner.clone(),
            originator: originator.clone(),
            description: description.to_string(),
            count,
        }
    }
}

impl Objection {
    /// Deliver raised/dropped notifications in walk order
    pub(crate) fn dispatch(&self, notes: &[Notification]) {
        for note in notes {
            let id = note.owner.id();
            let observers = self.state().observers.matching(&id);

            match note.kind {
                EventKind::Raised => {
                    note.owner
                        .on_raised(self, &note.originator, &note.description, note.count);
                    for observer in &observers {
                        observer.raised(self, &note.owner, &note.originator, &note.description, note.count);
                    }
                }
                EventKind::Dropped => {
                    note.owner
                        .on_dropped(self, &note.originator, &note.description, note.count);
                    for observer in &observers {
                        observer.dropped(self, &note.owner, &note.originator, &note.description, note.count);
                    }
                }
                // Walks never collect all-dropped
                EventKind::AllDropped => continue,
            }

            self.state().events.signal(&id, note.kind);
        }
    }

    /// Deliver all-dropped for `owner`, awaiting every hook
    pub(crate) async fn dispatch_all_dropped(
        &self,
        owner: &OwnerRef,
        originator: &OwnerRef,
        description: &str,
        count: u32,
    ) {
        let id = owner.id();
        let entry = self.state().ledger.entry(&id);
        self.trace(EventKind::AllDropped, &id, &originator.id(), description, 0, entry);

        owner
            .on_all_dropped(self, originator, description, count)
            .await;

        let observers = self.state().observers.matching(&id);
        for observer in &observers {
            observer
                .all_dropped(self, owner, originator, description, count)
                .await;
        }

        self.state().events.signal(&id, EventKind::AllDropped);
    }
}
