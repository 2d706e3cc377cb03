// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Objection: the coordination object owners raise and drop against
//!
//! Raises and drops walk from the owner toward the root applying the same
//! delta at every level. A drop that brings an owner's total to zero stops
//! there and hands a drain context to the scheduler; the rest of the walk
//! happens when that drain completes. A raise that meets a live drain
//! cancels it and forwards only the difference.
//!
//! Each call updates the ledger and decides propagation inside one critical
//! section. Hooks and observers run after the lock is released, so they may
//! call back into the objection.

use crate::dispatch::{Notification, ObjectionObserver, ObserverId, Observers};
use crate::drain::DrainSnapshot;
use crate::owner::OwnerRef;
use crate::registry::ObjectionId;
use crate::scheduler::{DrainScheduler, DrainTicket};
use crate::wait::EventSets;
use objection_core::{
    ContextKey, DrainBook, DrainContext, EventKind, Ledger, LedgerEntry, ObjectionConfig,
    ObjectionError, OwnerId, PoolStats,
};
use std::cmp::Ordering as CountOrdering;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Mutable state shared by every handle and task of one objection
pub(crate) struct State {
    pub(crate) ledger: Ledger,
    pub(crate) drains: DrainBook<OwnerRef>,
    pub(crate) observers: Observers,
    pub(crate) events: EventSets,
    /// Set by `clear`, reset by the next raise. Suppresses over-drop errors.
    pub(crate) cleared: bool,
}

pub(crate) struct Inner {
    id: ObjectionId,
    name: String,
    root: OwnerRef,
    trace: AtomicBool,
    state: Mutex<State>,
    scheduler: DrainScheduler,
}

/// Handle to a coordination object. Clones share state.
#[derive(Clone)]
pub struct Objection {
    inner: Arc<Inner>,
}

impl Objection {
    pub(crate) fn new(
        id: ObjectionId,
        config: ObjectionConfig,
        root: OwnerRef,
        scheduler: DrainScheduler,
    ) -> Self {
        tracing::debug!(objection = %config.name, root = root.name(), trace = config.trace, "objection created");
        Self {
            inner: Arc::new(Inner {
                id,
                root,
                trace: AtomicBool::new(config.trace),
                state: Mutex::new(State {
                    ledger: Ledger::new(config.name.clone(), config.drain_time),
                    drains: DrainBook::new(),
                    observers: Observers::default(),
                    events: EventSets::default(),
                    cleared: false,
                }),
                name: config.name,
                scheduler,
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn id(&self) -> ObjectionId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Owner used when `wait_for` is given none, and the target of `clear`
    pub fn root(&self) -> &OwnerRef {
        &self.inner.root
    }

    // === Raise / Drop ===

    /// Raise `count` objections on `owner`, which is also the originator.
    ///
    /// Fails without changing anything if a counter on the way to the root
    /// would overflow.
    pub fn raise(&self, owner: &OwnerRef, description: &str, count: u32) -> Result<(), ObjectionError> {
        self.raise_from(owner, owner, description, count)
    }

    /// Raise `count` objections on `owner` on behalf of `originator`
    pub fn raise_from(
        &self,
        owner: &OwnerRef,
        originator: &OwnerRef,
        description: &str,
        count: u32,
    ) -> Result<(), ObjectionError> {
        if count == 0 {
            return Ok(());
        }

        let mut notes = Vec::new();
        {
            let mut state = self.state();
            if let Err(e) = check_raise_walk(&state, owner, &originator.id(), count) {
                tracing::error!(objection = %self.inner.name, owner = owner.name(), error = %e, "objection raise rejected");
                return Err(e);
            }
            state.cleared = false;
            if let Err(e) =
                self.propagate_raise(&mut state, owner.clone(), originator, description, count, &mut notes)
            {
                tracing::error!(objection = %self.inner.name, error = %e, "inconsistent counts while reconciling a drain");
            }
        }

        self.dispatch(&notes);
        Ok(())
    }

    /// Drop `count` objections on `owner`, which is also the originator.
    ///
    /// Dropping more than is outstanding is an error unless the objection
    /// was cleared since the last raise, in which case the drop is ignored.
    pub fn drop(&self, owner: &OwnerRef, description: &str, count: u32) -> Result<(), ObjectionError> {
        self.drop_from(owner, owner, description, count)
    }

    /// Drop `count` objections on `owner` on behalf of `originator`
    pub fn drop_from(
        &self,
        owner: &OwnerRef,
        originator: &OwnerRef,
        description: &str,
        count: u32,
    ) -> Result<(), ObjectionError> {
        if count == 0 {
            return Ok(());
        }

        let mut notes = Vec::new();
        let result = {
            let mut state = self.state();
            match self.propagate_drop(&mut state, owner.clone(), originator, description, count, &mut notes) {
                Err(e) if state.cleared => {
                    tracing::debug!(objection = %self.inner.name, error = %e, "ignoring drop after clear");
                    Ok(())
                }
                other => other,
            }
        };

        self.dispatch(&notes);

        if let Err(e) = &result {
            tracing::error!(objection = %self.inner.name, owner = owner.name(), error = %e, "objection dropped below zero");
        }
        result
    }

    fn propagate_raise(
        &self,
        state: &mut State,
        mut owner: OwnerRef,
        originator: &OwnerRef,
        description: &str,
        mut count: u32,
        notes: &mut Vec<Notification>,
    ) -> Result<(), ObjectionError> {
        let originator_id = originator.id();
        loop {
            let id = owner.id();
            let entry = state.ledger.raise(&id, id == originator_id, count)?;
            self.trace(EventKind::Raised, &id, &originator_id, description, i64::from(count), entry);
            notes.push(Notification::new(EventKind::Raised, &owner, originator, description, count));

            let parent = owner.parent();

            if let Some(context) = state.drains.cancel(&id) {
                tracing::debug!(
                    objection = %self.inner.name,
                    owner = %id,
                    phase = ?context.phase,
                    pending_drop = context.count,
                    "raise cancelled drain"
                );
                // The parent still holds the count this drain would have dropped
                let Some(parent) = parent else {
                    return Ok(());
                };
                match count.cmp(&context.count) {
                    CountOrdering::Greater => count -= context.count,
                    CountOrdering::Less => {
                        // Forward the part of the cancelled drop the raise did not cover
                        return self.propagate_drop(
                            state,
                            parent,
                            &context.originator,
                            &context.description,
                            context.count - count,
                            notes,
                        );
                    }
                    CountOrdering::Equal => return Ok(()),
                }
                owner = parent;
                continue;
            }

            match parent {
                Some(parent) => owner = parent,
                None => return Ok(()),
            }
        }
    }

    fn propagate_drop(
        &self,
        state: &mut State,
        mut owner: OwnerRef,
        originator: &OwnerRef,
        description: &str,
        count: u32,
        notes: &mut Vec<Notification>,
    ) -> Result<(), ObjectionError> {
        let originator_id = originator.id();
        check_drop_walk(state, &owner, &originator_id, description, count)?;
        loop {
            let id = owner.id();
            let entry = state
                .ledger
                .drop(&id, id == originator_id, count, description)?;
            self.trace(EventKind::Dropped, &id, &originator_id, description, -i64::from(count), entry);
            notes.push(Notification::new(EventKind::Dropped, &owner, originator, description, count));

            if entry.total > 0 {
                match owner.parent() {
                    Some(parent) => {
                        owner = parent;
                        continue;
                    }
                    None => return Ok(()),
                }
            }

            // Quiescent: defer the rest of the walk to a drain
            let context = DrainContext::new(owner.clone(), originator.clone(), description, count);
            let key = state.drains.schedule(id, context);
            self.inner
                .scheduler
                .submit(DrainTicket::new(Arc::downgrade(&self.inner), key));
            return Ok(());
        }
    }

    // === Drain lifecycle (driven by the scheduler and drain tasks) ===

    /// Hand a queued context to a drain task. None if it was cancelled.
    pub(crate) fn start_drain(&self, key: ContextKey) -> Option<DrainSnapshot> {
        let mut state = self.state();
        if !state.drains.start(key) {
            return None;
        }
        let context = state.drains.get(key)?;
        let drain_time = state.ledger.drain_time(&context.owner.id());
        Some(DrainSnapshot {
            owner: context.owner.clone(),
            originator: context.originator.clone(),
            description: context.description.clone(),
            count: context.count,
            drain_time,
        })
    }

    /// Whether the drain holding `key` is still wanted
    pub(crate) fn drain_is_live(&self, key: ContextKey) -> bool {
        self.state().drains.is_running(key)
    }

    /// Release the context and continue the drop at the owner's parent.
    ///
    /// Returns false if the drain was cancelled before it could complete.
    pub(crate) fn complete_drain(&self, key: ContextKey) -> Result<bool, ObjectionError> {
        let mut notes = Vec::new();
        let result = {
            let mut state = self.state();
            let Some(context) = state.drains.finish(key) else {
                return Ok(false);
            };
            match context.owner.parent() {
                Some(parent) => self.propagate_drop(
                    &mut state,
                    parent,
                    &context.originator,
                    &context.description,
                    context.count,
                    &mut notes,
                ),
                None => Ok(()),
            }
        };

        self.dispatch(&notes);
        result.map(|()| true)
    }

    // === Clear ===

    /// Forget every count and cancel every drain, then fire all-dropped at
    /// the root.
    ///
    /// A second clear with nothing raised in between does nothing.
    pub async fn clear(&self, caller: &OwnerRef) {
        let fire = {
            let mut state = self.state();
            let outstanding = state.ledger.has_outstanding() || state.drains.live_len() > 0;
            let already_clear = state.cleared && !outstanding;

            if outstanding {
                tracing::warn!(
                    objection = %self.inner.name,
                    caller = caller.name(),
                    objectors = state.ledger.objectors().len(),
                    "clearing objection with outstanding counts"
                );
            }

            state.ledger.clear_counts();
            let cancelled = state.drains.cancel_all();
            if !cancelled.is_empty() {
                tracing::debug!(objection = %self.inner.name, cancelled = cancelled.len(), "clear cancelled drains");
            }
            state.cleared = true;
            !already_clear
        };

        if fire {
            let root = self.inner.root.clone();
            self.dispatch_all_dropped(&root, caller, "clear", 0).await;
        }
    }

    // === Drain time ===

    pub fn set_drain_time(&self, owner: &OwnerRef, drain_time: Duration) {
        self.state().ledger.set_drain_time(&owner.id(), drain_time);
    }

    pub fn get_drain_time(&self, owner: &OwnerRef) -> Duration {
        self.state().ledger.drain_time(&owner.id())
    }

    // === Introspection ===

    /// Objections raised with `owner` as originator
    pub fn get_count(&self, owner: &OwnerRef) -> u32 {
        self.state().ledger.source_count(&owner.id())
    }

    /// Objections outstanding in `owner`'s subtree
    pub fn get_total(&self, owner: &OwnerRef) -> u32 {
        self.state().ledger.total_count(&owner.id())
    }

    /// Owners currently holding objections they raised themselves
    pub fn objectors(&self) -> Vec<OwnerId> {
        self.state().ledger.objectors()
    }

    /// Whether a drain is pending or running for `owner`
    pub fn is_draining(&self, owner: &OwnerRef) -> bool {
        self.state().drains.active(&owner.id()).is_some()
    }

    /// True once the root holds nothing and no drain is in flight
    pub fn is_quiescent(&self) -> bool {
        let state = self.state();
        !state.ledger.has_outstanding() && state.drains.live_len() == 0
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.state().drains.pool_stats()
    }

    // === Observers ===

    /// Register an observer for every owner (`scope == None`) or just one
    pub fn add_observer(
        &self,
        scope: Option<&OwnerRef>,
        observer: Arc<dyn ObjectionObserver>,
    ) -> ObserverId {
        self.state().observers.add(scope.map(|o| o.id()), observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.state().observers.remove(id)
    }

    // === Trace ===

    pub fn set_trace(&self, on: bool) {
        self.inner.trace.store(on, Ordering::Relaxed);
    }

    pub fn trace_enabled(&self) -> bool {
        self.inner.trace.load(Ordering::Relaxed)
    }

    pub(crate) fn trace(
        &self,
        kind: EventKind,
        owner: &OwnerId,
        originator: &OwnerId,
        description: &str,
        delta: i64,
        entry: LedgerEntry,
    ) {
        if !self.trace_enabled() {
            return;
        }
        tracing::info!(
            target: "objection::trace",
            objection = %self.inner.name,
            owner = %owner,
            originator = %originator,
            delta,
            count = entry.source,
            total = entry.total,
            description,
            "{}",
            kind
        );
    }

    /// Text dump of every owner holding objections
    pub fn report(&self) -> String {
        let outstanding = self.state().ledger.outstanding();
        let mut out = format!("objection '{}'\n", self.inner.name);
        if outstanding.is_empty() {
            out.push_str("  no objections outstanding\n");
            return out;
        }
        out.push_str("  source  total  owner\n");
        for (owner, entry) in outstanding {
            let _ = writeln!(out, "  {:>6}  {:>5}  {}", entry.source, entry.total, owner);
        }
        out
    }
}

/// Check every level a raise will touch before any of them changes.
///
/// Mirrors the reconciliation in `propagate_raise`: a live drain absorbs up
/// to its own count, and only the rest travels further up.
fn check_raise_walk(
    state: &State,
    owner: &OwnerRef,
    originator: &OwnerId,
    mut count: u32,
) -> Result<(), ObjectionError> {
    let mut owner = owner.clone();
    loop {
        let id = owner.id();
        state.ledger.check_raise(&id, id == *originator, count)?;

        let pending = state
            .drains
            .active(&id)
            .and_then(|key| state.drains.get(key))
            .map(|context| context.count);
        if let Some(pending) = pending {
            if count <= pending {
                return Ok(());
            }
            count -= pending;
        }

        match owner.parent() {
            Some(parent) => owner = parent,
            None => return Ok(()),
        }
    }
}

/// Check every level from `owner` to the root before a drop changes any.
///
/// Levels above the one that reaches zero are only reached when its drain
/// completes, but they are checked now so an over-drop of the originator's
/// source count fails at the call. Their totals already include the count.
fn check_drop_walk(
    state: &State,
    owner: &OwnerRef,
    originator: &OwnerId,
    description: &str,
    count: u32,
) -> Result<(), ObjectionError> {
    let mut owner = owner.clone();
    loop {
        let id = owner.id();
        state
            .ledger
            .check_drop(&id, id == *originator, count, description)?;
        match owner.parent() {
            Some(parent) => owner = parent,
            None => return Ok(()),
        }
    }
}

impl std::fmt::Debug for Objection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Objection")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("root", &self.inner.root.name())
            .finish()
    }
}

#[cfg(test)]
#[path = "objection_tests.rs"]
mod tests;
