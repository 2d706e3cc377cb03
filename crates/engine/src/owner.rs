// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner capability
//!
//! The owner tree belongs to the caller. An objection only needs each owner's
//! name and parent, plus whichever hooks the owner cares about.

use crate::Objection;
use async_trait::async_trait;
use objection_core::OwnerId;
use std::sync::Arc;

/// Shared handle to an owner
pub type OwnerRef = Arc<dyn Owner>;

/// A node in the owner tree that can hold objections
#[async_trait]
pub trait Owner: Send + Sync {
    /// Full hierarchical name, unique within the tree
    fn name(&self) -> &str;

    /// Parent owner, or `None` for the root
    fn parent(&self) -> Option<OwnerRef>;

    fn id(&self) -> OwnerId {
        OwnerId::new(self.name())
    }

    /// Called synchronously when this owner's count goes up
    ///
    /// Hooks run once the whole raise has been applied up to the root, in
    /// order from the originator upward. Totals read from inside the hook
    /// already include every ancestor's update for this call.
    fn on_raised(
        &self,
        _objection: &Objection,
        _originator: &OwnerRef,
        _description: &str,
        _count: u32,
    ) {
    }

    /// Called synchronously when this owner's count goes down
    ///
    /// Like [`on_raised`](Self::on_raised), this runs after the call's
    /// ledger updates are complete.
    fn on_dropped(
        &self,
        _objection: &Objection,
        _originator: &OwnerRef,
        _description: &str,
        _count: u32,
    ) {
    }

    /// Awaited once this owner's subtree has drained, before the drop moves
    /// on to the parent
    async fn on_all_dropped(
        &self,
        _objection: &Objection,
        _originator: &OwnerRef,
        _description: &str,
        _count: u32,
    ) {
    }
}

/// Plain tree node with no hooks
#[derive(Clone)]
pub struct Node {
    name: String,
    parent: Option<OwnerRef>,
}

impl Node {
    pub fn new(name: impl Into<String>, parent: Option<OwnerRef>) -> OwnerRef {
        Arc::new(Self {
            name: name.into(),
            parent,
        })
    }

    pub fn root(name: impl Into<String>) -> OwnerRef {
        Self::new(name, None)
    }

    /// Child named `<parent>.<leaf>`
    pub fn child(parent: &OwnerRef, leaf: &str) -> OwnerRef {
        Self::new(format!("{}.{}", parent.name(), leaf), Some(parent.clone()))
    }
}

impl Owner for Node {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<OwnerRef> {
        self.parent.clone()
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}
