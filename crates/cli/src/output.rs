// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use async_trait::async_trait;
use objection_core::{EventKind, ObjectionEvent};
use objection_engine::{Objection, ObjectionObserver, OwnerRef};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    /// One JSON document per line
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Print one value in the specified format
pub fn print<T: Serialize + std::fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string(value) {
                println!("{}", json);
            }
        }
    }
}

/// Observer that prints every notification as it happens
pub struct EventPrinter {
    format: OutputFormat,
}

impl EventPrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn emit(
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
        print(&event, self.format);
    }
}

#[async_trait]
impl ObjectionObserver for EventPrinter {
    fn raised(
        &self,
        objection: &Objection,
        owner: &OwnerRef,
        originator: &OwnerRef,
        description: &str,
        count: u32,
    ) {
        self.emit(EventKind::Raised, objection, owner, originator, description, count);
    }

    fn dropped(
        &self,
        objection: &Objection,
        owner: &OwnerRef,
        originator: &OwnerRef,
        description: &str,
        count: u32,
    ) {
        self.emit(EventKind::Dropped, objection, owner, originator, description, count);
    }

    async fn all_dropped(
        &self,
        objection: &Objection,
        owner: &OwnerRef,
        originator: &OwnerRef,
        description: &str,
        count: u32,
    ) {
        self.emit(EventKind::AllDropped, objection, owner, originator, description, count);
    }
}
