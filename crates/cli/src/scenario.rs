// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario files for the simulator
//!
//! A scenario declares one objection, an owner tree (parents before
//! children) and a timeline of raise/drop steps:
//!
//! ```toml
//! [objection]
//! name = "run_phase"
//!
//! [[owner]]
//! name = "top"
//!
//! [[owner]]
//! name = "top.env"
//! parent = "top"
//! drain_time = "20ms"
//!
//! [[step]]
//! at = "0ms"
//! action = "raise"
//! owner = "top.env"
//! ```

use anyhow::Context;
use objection_core::ObjectionConfig;
use objection_engine::{Node, OwnerRef};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub objection: ObjectionConfig,
    #[serde(default, rename = "owner")]
    pub owners: Vec<OwnerSpec>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OwnerSpec {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default, with = "humantime_serde")]
    pub drain_time: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Raise,
    Drop,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Offset from the start of the run
    #[serde(with = "humantime_serde")]
    pub at: Duration,
    pub action: Action,
    pub owner: String,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub description: String,
}

fn default_count() -> u32 {
    1
}

/// Problems found by [`Scenario::validate_tree`] and
/// [`Scenario::validate_balances`]. Steps are numbered from 1 in file order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("scenario declares no root owner")]
    NoRoot,
    #[error("scenario declares more than one root: '{first}' and '{second}'")]
    MultipleRoots { first: String, second: String },
    #[error("owner '{0}' is declared twice")]
    DuplicateOwner(String),
    #[error("owner '{owner}' names parent '{parent}', which is not declared before it")]
    UnknownParent { owner: String, parent: String },
    #[error("step {step} refers to unknown owner '{owner}'")]
    UnknownOwner { step: usize, owner: String },
    #[error("step {step} raises '{owner}' past {} outstanding objections", u32::MAX)]
    TooManyRaised { step: usize, owner: String },
    #[error("step {step} drops {count} from '{owner}' with only {outstanding} raised")]
    Overdrop {
        step: usize,
        owner: String,
        count: u32,
        outstanding: u32,
    },
}

impl Scenario {
    pub fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    /// Check the owner tree and that every step names a declared owner
    pub fn validate_tree(&self) -> Vec<ScenarioError> {
        let mut problems = Vec::new();
        let mut declared: Vec<&str> = Vec::new();
        let mut root: Option<&str> = None;

        for owner in &self.owners {
            if declared.contains(&owner.name.as_str()) {
                problems.push(ScenarioError::DuplicateOwner(owner.name.clone()));
                continue;
            }
            match &owner.parent {
                None => match root {
                    Some(first) => problems.push(ScenarioError::MultipleRoots {
                        first: first.to_string(),
                        second: owner.name.clone(),
                    }),
                    None => root = Some(&owner.name),
                },
                Some(parent) if !declared.contains(&parent.as_str()) => {
                    problems.push(ScenarioError::UnknownParent {
                        owner: owner.name.clone(),
                        parent: parent.clone(),
                    });
                }
                Some(_) => {}
            }
            declared.push(&owner.name);
        }
        if root.is_none() {
            problems.push(ScenarioError::NoRoot);
        }

        for (i, step) in self.steps.iter().enumerate() {
            if !declared.contains(&step.owner.as_str()) {
                problems.push(ScenarioError::UnknownOwner {
                    step: i + 1,
                    owner: step.owner.clone(),
                });
            }
        }
        problems
    }

    /// Replay the timeline and report any drop of more than an owner raised,
    /// or a raise its counter cannot hold
    pub fn validate_balances(&self) -> Vec<ScenarioError> {
        let mut problems = Vec::new();
        let mut balance: HashMap<&str, u32> = HashMap::new();

        for (number, step) in self.timeline() {
            let outstanding = balance.entry(step.owner.as_str()).or_default();
            match step.action {
                Action::Raise => match outstanding.checked_add(step.count) {
                    Some(sum) => *outstanding = sum,
                    None => problems.push(ScenarioError::TooManyRaised {
                        step: number,
                        owner: step.owner.clone(),
                    }),
                },
                Action::Drop if step.count > *outstanding => {
                    problems.push(ScenarioError::Overdrop {
                        step: number,
                        owner: step.owner.clone(),
                        count: step.count,
                        outstanding: *outstanding,
                    });
                }
                Action::Drop => *outstanding -= step.count,
            }
        }
        problems
    }

    /// Steps in execution order with their 1-based file position. Ties keep
    /// file order.
    pub fn timeline(&self) -> Vec<(usize, &Step)> {
        let mut steps: Vec<(usize, &Step)> =
            self.steps.iter().enumerate().map(|(i, s)| (i + 1, s)).collect();
        steps.sort_by_key(|(_, s)| s.at);
        steps
    }

    /// Build the owner tree. Returns the root and every owner by name.
    ///
    /// Call only after [`validate_tree`](Self::validate_tree) came back empty.
    pub fn build_owners(&self) -> anyhow::Result<(OwnerRef, HashMap<String, OwnerRef>)> {
        let mut owners: HashMap<String, OwnerRef> = HashMap::new();
        let mut root = None;

        for spec in &self.owners {
            let parent = match &spec.parent {
                Some(name) => Some(
                    owners
                        .get(name)
                        .cloned()
                        .ok_or_else(|| anyhow::anyhow!("unknown parent '{}'", name))?,
                ),
                None => None,
            };
            let owner = Node::new(spec.name.clone(), parent);
            if spec.parent.is_none() {
                root = Some(owner.clone());
            }
            owners.insert(spec.name.clone(), owner);
        }

        let root = root.ok_or_else(|| anyhow::anyhow!("scenario declares no root owner"))?;
        Ok((root, owners))
    }
}

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod tests;
