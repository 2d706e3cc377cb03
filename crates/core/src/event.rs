// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types for objection notifications

use serde::{Deserialize, Serialize};

/// The three notifications an objection emits per owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Count went up on the owner
    Raised,
    /// Count went down on the owner
    Dropped,
    /// The owner's subtree drained and stayed quiescent for its drain time
    AllDropped,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Raised, EventKind::Dropped, EventKind::AllDropped];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Raised => "raised",
            EventKind::Dropped => "dropped",
            EventKind::AllDropped => "all_dropped",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raised" => Ok(EventKind::Raised),
            "dropped" => Ok(EventKind::Dropped),
            "all_dropped" | "all-dropped" => Ok(EventKind::AllDropped),
            other => Err(format!("unknown event kind: {other}")),
        }
    }
}

/// A notification as seen by an observer, with the owner's total at dispatch time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectionEvent {
    pub kind: EventKind,
    pub objection: String,
    pub owner: String,
    pub originator: String,
    pub description: String,
    pub count: u32,
    pub total: u32,
}

impl std::fmt::Display for ObjectionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} count={} total={} originator={}",
            self.kind, self.owner, self.count, self.total, self.originator
        )?;
        if !self.description.is_empty() {
            write!(f, " [{}]", self.description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
