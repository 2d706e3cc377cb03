// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drain bookkeeping
//!
//! Tracks which owners have a drain in flight, in which phase, and the FIFO
//! of contexts not yet handed to a drain task. At most one live context may
//! exist per owner.

use crate::id::OwnerId;
use crate::pool::{ContextKey, ContextPool, DrainContext, DrainPhase, PoolStats};
use std::collections::{HashMap, VecDeque};

/// Drain state for one objection
#[derive(Clone, Debug)]
pub struct DrainBook<O> {
    pool: ContextPool<O>,
    /// Contexts waiting for the scheduler, in creation order
    pending: VecDeque<ContextKey>,
    by_owner: HashMap<OwnerId, ContextKey>,
    owners: HashMap<ContextKey, OwnerId>,
}

impl<O> Default for DrainBook<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> DrainBook<O> {
    pub fn new() -> Self {
        Self {
            pool: ContextPool::new(),
            pending: VecDeque::new(),
            by_owner: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    /// Record a new pending drain for `owner`
    pub fn schedule(&mut self, owner: OwnerId, context: DrainContext<O>) -> ContextKey {
        debug_assert!(
            !self.by_owner.contains_key(&owner),
            "second live drain context for {owner}"
        );
        if let Some(stale) = self.by_owner.get(&owner).copied() {
            self.discard(stale);
        }

        let key = self.pool.acquire(context);
        self.pending.push_back(key);
        self.by_owner.insert(owner.clone(), key);
        self.owners.insert(key, owner);
        key
    }

    /// Move a pending context to running. False if it was cancelled meanwhile.
    pub fn start(&mut self, key: ContextKey) -> bool {
        let Some(position) = self.pending.iter().position(|k| *k == key) else {
            return false;
        };
        self.pending.remove(position);
        match self.pool.get_mut(key) {
            Some(context) => {
                context.phase = DrainPhase::Running;
                true
            }
            None => false,
        }
    }

    /// Whether a drain task holding `key` should keep going
    pub fn is_running(&self, key: ContextKey) -> bool {
        self.pool
            .get(key)
            .is_some_and(|c| c.phase == DrainPhase::Running)
    }

    pub fn get(&self, key: ContextKey) -> Option<&DrainContext<O>> {
        self.pool.get(key)
    }

    /// Live context for an owner, pending or running
    pub fn active(&self, owner: &OwnerId) -> Option<ContextKey> {
        self.by_owner.get(owner).copied()
    }

    /// Cancel the owner's live drain, returning what it was going to propagate
    pub fn cancel(&mut self, owner: &OwnerId) -> Option<DrainContext<O>> {
        let key = self.by_owner.get(owner).copied()?;
        self.discard(key)
    }

    /// Complete a running drain. None if it was cancelled.
    pub fn finish(&mut self, key: ContextKey) -> Option<DrainContext<O>> {
        if !self.is_running(key) {
            return None;
        }
        self.discard(key)
    }

    /// Cancel every live drain
    pub fn cancel_all(&mut self) -> Vec<DrainContext<O>> {
        let keys: Vec<ContextKey> = self.owners.keys().copied().collect();
        keys.into_iter().filter_map(|key| self.discard(key)).collect()
    }

    fn discard(&mut self, key: ContextKey) -> Option<DrainContext<O>> {
        if let Some(owner) = self.owners.remove(&key) {
            if self.by_owner.get(&owner) == Some(&key) {
                self.by_owner.remove(&owner);
            }
        }
        if let Some(position) = self.pending.iter().position(|k| *k == key) {
            self.pending.remove(position);
        }
        self.pool.release(key)
    }

    /// Contexts queued but not yet started
    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Contexts pending or running
    pub fn live_len(&self) -> usize {
        self.by_owner.len()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
