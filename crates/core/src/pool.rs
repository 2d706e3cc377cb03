// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drain context pool
//!
//! Contexts live in a slot arena with a free list so high-frequency
//! raise/drop churn reuses slots instead of allocating. Keys carry a
//! generation: a key whose slot was released (and possibly reused) no longer
//! resolves, which is how a drain task notices it was cancelled.

/// Handle to a live drain context
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextKey {
    index: u32,
    generation: u32,
}

impl std::fmt::Display for ContextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ctx-{}.{}", self.index, self.generation)
    }
}

/// Where a drain context is in its handoff
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainPhase {
    /// Queued for the scheduler, no drain task yet
    Pending,
    /// A drain task owns it
    Running,
}

/// One "total reached zero" event in flight
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrainContext<O> {
    /// Owner whose total reached zero
    pub owner: O,
    /// Owner that issued the drop
    pub originator: O,
    pub description: String,
    /// Count to forward to the parent once drained
    pub count: u32,
    pub phase: DrainPhase,
}

impl<O> DrainContext<O> {
    pub fn new(owner: O, originator: O, description: impl Into<String>, count: u32) -> Self {
        Self {
            owner,
            originator,
            description: description.into(),
            count,
            phase: DrainPhase::Pending,
        }
    }
}

/// Slot usage counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Slots ever allocated
    pub allocated: usize,
    /// Slots holding a context
    pub live: usize,
    /// Slots waiting for reuse
    pub free: usize,
}

#[derive(Clone, Debug)]
struct Slot<O> {
    generation: u32,
    context: Option<DrainContext<O>>,
}

/// Arena of drain contexts with index reuse
#[derive(Clone, Debug)]
pub struct ContextPool<O> {
    slots: Vec<Slot<O>>,
    free: Vec<u32>,
}

impl<O> Default for ContextPool<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> ContextPool<O> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store a context, reusing a free slot when one exists
    pub fn acquire(&mut self, context: DrainContext<O>) -> ContextKey {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.context = Some(context);
                return ContextKey {
                    index,
                    generation: slot.generation,
                };
            }
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            context: Some(context),
        });
        ContextKey {
            index,
            generation: 0,
        }
    }

    fn slot(&self, key: ContextKey) -> Option<&Slot<O>> {
        self.slots
            .get(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
    }

    pub fn get(&self, key: ContextKey) -> Option<&DrainContext<O>> {
        self.slot(key).and_then(|slot| slot.context.as_ref())
    }

    pub fn get_mut(&mut self, key: ContextKey) -> Option<&mut DrainContext<O>> {
        self.slots
            .get_mut(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.context.as_mut())
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, key: ContextKey) -> bool {
        self.get(key).is_some()
    }

    /// Clear a context and return its slot to the free list.
    ///
    /// Every outstanding copy of `key` stops resolving.
    pub fn release(&mut self, key: ContextKey) -> Option<DrainContext<O>> {
        let slot = self
            .slots
            .get_mut(key.index as usize)
            .filter(|slot| slot.generation == key.generation)?;
        let context = slot.context.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        Some(context)
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            allocated: self.slots.len(),
            live: self.slots.iter().filter(|s| s.context.is_some()).count(),
            free: self.free.len(),
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
