// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of coordination objects
//!
//! Owns the process's drain scheduler and keeps every objection it created
//! discoverable for lookups and debug dumps.

use crate::owner::OwnerRef;
use crate::scheduler::DrainScheduler;
use crate::Objection;
use objection_core::ObjectionConfig;
use std::sync::Mutex;

/// Index of an objection within its registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectionId(pub usize);

impl std::fmt::Display for ObjectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "objection-{}", self.0)
    }
}

/// Creates objections bound to one shared drain scheduler
pub struct ObjectionRegistry {
    scheduler: DrainScheduler,
    objections: Mutex<Vec<Objection>>,
}

impl ObjectionRegistry {
    /// Must be called within a tokio runtime.
    pub fn new() -> Self {
        Self {
            scheduler: DrainScheduler::spawn(),
            objections: Mutex::new(Vec::new()),
        }
    }

    /// Create an objection whose tree is rooted at `root`
    pub fn create(&self, config: ObjectionConfig, root: OwnerRef) -> Objection {
        let mut objections = self.objections.lock().unwrap_or_else(|e| e.into_inner());
        let id = ObjectionId(objections.len());
        let objection = Objection::new(id, config, root, self.scheduler.clone());
        objections.push(objection.clone());
        objection
    }

    pub fn get(&self, id: ObjectionId) -> Option<Objection> {
        self.all().get(id.0).cloned()
    }

    /// First objection with the given name
    pub fn find(&self, name: &str) -> Option<Objection> {
        self.all().into_iter().find(|o| o.name() == name)
    }

    pub fn all(&self) -> Vec<Objection> {
        self.objections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Debug dump of every objection in creation order
    pub fn report(&self) -> String {
        self.all().iter().map(Objection::report).collect()
    }
}

impl Default for ObjectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
