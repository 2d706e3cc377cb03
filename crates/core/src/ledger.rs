// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-owner objection counts
//!
//! The ledger is pure bookkeeping: it applies one delta to one owner and
//! reports the resulting counts. Walking the owner tree is the caller's job.

use crate::error::{Counter, ObjectionError};
use crate::id::OwnerId;
use std::collections::HashMap;
use std::time::Duration;

/// Counts held for one owner
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Objections raised with this owner as originator
    pub source: u32,
    /// Objections outstanding in this owner's subtree, including `source`
    pub total: u32,
}

impl LedgerEntry {
    pub fn is_zero(&self) -> bool {
        self.source == 0 && self.total == 0
    }
}

/// Counts and drain times for every owner of one objection
#[derive(Clone, Debug)]
pub struct Ledger {
    name: String,
    /// Only owners with a nonzero count have an entry
    entries: HashMap<OwnerId, LedgerEntry>,
    /// Kept apart from `entries` so pruning and clearing never lose them
    drain_times: HashMap<OwnerId, Duration>,
    default_drain_time: Duration,
}

impl Ledger {
    pub fn new(name: impl Into<String>, default_drain_time: Duration) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
            drain_times: HashMap::new(),
            default_drain_time,
        }
    }

    pub fn entry(&self, owner: &OwnerId) -> LedgerEntry {
        self.entries.get(owner).copied().unwrap_or_default()
    }

    pub fn source_count(&self, owner: &OwnerId) -> u32 {
        self.entry(owner).source
    }

    pub fn total_count(&self, owner: &OwnerId) -> u32 {
        self.entry(owner).total
    }

    /// Verify a raise without applying it
    pub fn check_raise(&self, owner: &OwnerId, is_source: bool, count: u32) -> Result<(), ObjectionError> {
        let entry = self.entry(owner);
        let overflow = |counter, outstanding| ObjectionError::Overflow {
            objection: self.name.clone(),
            owner: owner.clone(),
            count,
            outstanding,
            counter,
        };

        if is_source && entry.source.checked_add(count).is_none() {
            return Err(overflow(Counter::Source, entry.source));
        }
        if entry.total.checked_add(count).is_none() {
            return Err(overflow(Counter::Total, entry.total));
        }
        Ok(())
    }

    /// Add `count` to the owner's total, and to its source count when the
    /// owner is also the originator. Fails without touching the entry if a
    /// counter would overflow.
    pub fn raise(
        &mut self,
        owner: &OwnerId,
        is_source: bool,
        count: u32,
    ) -> Result<LedgerEntry, ObjectionError> {
        self.check_raise(owner, is_source, count)?;

        let entry = self.entries.entry(owner.clone()).or_default();
        entry.total += count;
        if is_source {
            entry.source += count;
        }
        Ok(*entry)
    }

    /// Verify a drop without applying it
    pub fn check_drop(
        &self,
        owner: &OwnerId,
        is_source: bool,
        count: u32,
        description: &str,
    ) -> Result<(), ObjectionError> {
        let entry = self.entry(owner);
        let underflow = |counter, available| ObjectionError::Underflow {
            objection: self.name.clone(),
            owner: owner.clone(),
            description: description.to_string(),
            count,
            available,
            counter,
        };

        if is_source && count > entry.source {
            return Err(underflow(Counter::Source, entry.source));
        }
        if count > entry.total {
            return Err(underflow(Counter::Total, entry.total));
        }
        Ok(())
    }

    /// Subtract `count` from the owner. The ledger is untouched on error.
    pub fn drop(
        &mut self,
        owner: &OwnerId,
        is_source: bool,
        count: u32,
        description: &str,
    ) -> Result<LedgerEntry, ObjectionError> {
        self.check_drop(owner, is_source, count, description)?;

        let Some(entry) = self.entries.get_mut(owner) else {
            // Only reachable for a zero-count drop on an unknown owner
            return Ok(LedgerEntry::default());
        };
        entry.total -= count;
        if is_source {
            entry.source -= count;
        }

        let result = *entry;
        if result.is_zero() {
            self.entries.remove(owner);
        }
        Ok(result)
    }

    pub fn set_drain_time(&mut self, owner: &OwnerId, drain_time: Duration) {
        self.drain_times.insert(owner.clone(), drain_time);
    }

    pub fn drain_time(&self, owner: &OwnerId) -> Duration {
        self.drain_times
            .get(owner)
            .copied()
            .unwrap_or(self.default_drain_time)
    }

    pub fn has_outstanding(&self) -> bool {
        self.entries.values().any(|e| e.total > 0 || e.source > 0)
    }

    /// Zero every count. Drain times survive.
    ///
    /// Returns true if anything was outstanding.
    pub fn clear_counts(&mut self) -> bool {
        let had_outstanding = self.has_outstanding();
        self.entries.clear();
        had_outstanding
    }

    /// Owners that raised objections themselves, sorted by name
    pub fn objectors(&self) -> Vec<OwnerId> {
        let mut owners: Vec<OwnerId> = self
            .entries
            .iter()
            .filter(|(_, e)| e.source > 0)
            .map(|(id, _)| id.clone())
            .collect();
        owners.sort();
        owners
    }

    /// Every owner with a nonzero count, sorted by name
    pub fn outstanding(&self) -> Vec<(OwnerId, LedgerEntry)> {
        let mut entries: Vec<(OwnerId, LedgerEntry)> = self
            .entries
            .iter()
            .map(|(id, e)| (id.clone(), *e))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Number of owners currently holding counts
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
