// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording owner and observer for tests

use crate::dispatch::ObjectionObserver;
use crate::owner::{Owner, OwnerRef};
use crate::Objection;
use async_trait::async_trait;
use objection_core::{EventKind, ObjectionEvent};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Observer that records every notification it sees
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ObjectionEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ObjectionEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Events of one kind, as `(owner, count)` pairs
    pub fn of_kind(&self, kind: EventKind) -> Vec<(String, u32)> {
        self.events()
            .into_iter()
            .filter(|e| e.kind == kind)
            .map(|e| (e.owner, e.count))
            .collect()
    }

    /// Number of `kind` events seen for `owner`
    pub fn count(&self, kind: EventKind, owner: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.kind == kind && e.owner == owner)
            .count()
    }

    fn record(
        &self,
        kind: EventKind,
        objection: &Objection,
        owner: &OwnerRef,
        originator: &OwnerRef,
        description: &str,
        count: u32,
    ) {
        let event = ObjectionEvent {
            kind,
            objection: objection.name().to_string(),
            owner: owner.name().to_string(),
            originator: originator.name().to_string(),
            description: description.to_string(),
            count,
            total: objection.get_total(owner),
        };
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

#[async_trait]
impl ObjectionObserver for RecordingObserver {
    fn raised(
        &self,
        objection: &Objection,
        owner: &OwnerRef,
        originator: &OwnerRef,
        description: &str,
        count: u32,
    ) {
        self.record(EventKind::Raised, objection, owner, originator, description, count);
    }

    fn dropped(
        &self,
        objection: &Objection,
        owner: &OwnerRef,
        originator: &OwnerRef,
        description: &str,
        count: u32,
    ) {
        self.record(EventKind::Dropped, objection, owner, originator, description, count);
    }

    async fn all_dropped(
        &self,
        objection: &Objection,
        owner: &OwnerRef,
        originator: &OwnerRef,
        description: &str,
        count: u32,
    ) {
        self.record(EventKind::AllDropped, objection, owner, originator, description, count);
    }
}

/// A hook invocation seen by a [`RecordingOwner`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookCall {
    pub kind: EventKind,
    pub originator: String,
    pub description: String,
    pub count: u32,
}

/// Owner that records its own hook calls
pub struct RecordingOwner {
    name: String,
    parent: Option<OwnerRef>,
    /// Simulated async work inside `on_all_dropped`
    all_dropped_delay: Duration,
    calls: Mutex<Vec<HookCall>>,
}

impl RecordingOwner {
    pub fn new(name: impl Into<String>, parent: Option<OwnerRef>) -> Self {
        Self {
            name: name.into(),
            parent,
            all_dropped_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn root(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(name, None))
    }

    /// Child named `<parent>.<leaf>`
    pub fn child(parent: &OwnerRef, leaf: &str) -> Arc<Self> {
        Arc::new(Self::new(
            format!("{}.{}", parent.name(), leaf),
            Some(parent.clone()),
        ))
    }

    pub fn with_all_dropped_delay(mut self, delay: Duration) -> Self {
        self.all_dropped_delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<HookCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of `kind` hook calls so far
    pub fn count(&self, kind: EventKind) -> usize {
        self.calls().iter().filter(|c| c.kind == kind).count()
    }

    fn record(&self, kind: EventKind, originator: &OwnerRef, description: &str, count: u32) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(HookCall {
                kind,
                originator: originator.name().to_string(),
                description: description.to_string(),
                count,
            });
    }
}

#[async_trait]
impl Owner for RecordingOwner {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<OwnerRef> {
        self.parent.clone()
    }

    fn on_raised(&self, _objection: &Objection, originator: &OwnerRef, description: &str, count: u32) {
        self.record(EventKind::Raised, originator, description, count);
    }

    fn on_dropped(&self, _objection: &Objection, originator: &OwnerRef, description: &str, count: u32) {
        self.record(EventKind::Dropped, originator, description, count);
    }

    async fn on_all_dropped(
        &self,
        _objection: &Objection,
        originator: &OwnerRef,
        description: &str,
        count: u32,
    ) {
        if !self.all_dropped_delay.is_zero() {
            tokio::time::sleep(self.all_dropped_delay).await;
        }
        self.record(EventKind::AllDropped, originator, description, count);
    }
}
