// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `objection run <scenario>` - Play a scenario and wait for quiescence

use crate::output::{EventPrinter, OutputFormat};
use crate::scenario::{Action, Scenario};
use anyhow::{bail, Context, Result};
use objection_engine::{Objection, ObjectionRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Instant};

#[derive(clap::Args)]
pub struct RunArgs {
    /// Scenario file (TOML)
    pub scenario: PathBuf,

    /// Log every raise, drop and all-dropped to stderr
    #[arg(long)]
    pub trace: bool,

    /// Print notifications as JSON lines
    #[arg(long)]
    pub json: bool,

    /// How long to wait for quiescence after the last step
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,
}

pub async fn handle(args: RunArgs) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let problems = scenario.validate_tree();
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("error: {}", problem);
        }
        bail!("{} is invalid", args.scenario.display());
    }

    let (root, owners) = scenario.build_owners()?;
    let registry = ObjectionRegistry::new();
    let mut config = scenario.objection.clone();
    if args.trace {
        config = config.with_trace(true);
    }
    let objection = registry.create(config, root);

    for spec in &scenario.owners {
        if let (Some(drain_time), Some(owner)) = (spec.drain_time, owners.get(&spec.name)) {
            objection.set_drain_time(owner, drain_time);
        }
    }
    let format = OutputFormat::from_json_flag(args.json);
    objection.add_observer(None, Arc::new(EventPrinter::new(format)));

    let start = Instant::now();
    for (number, step) in scenario.timeline() {
        tokio::time::sleep_until(start + step.at).await;
        let owner = owners
            .get(&step.owner)
            .with_context(|| format!("step {} refers to unknown owner '{}'", number, step.owner))?;
        tracing::debug!(step = number, action = ?step.action, owner = %step.owner, count = step.count, "step");
        let result = match step.action {
            Action::Raise => objection.raise(owner, &step.description, step.count),
            Action::Drop => objection.drop(owner, &step.description, step.count),
        };
        result.with_context(|| format!("step {} failed", number))?;
    }

    let quiescent = wait_quiescent(&objection, args.timeout).await;
    // Keep stdout parseable as JSON lines
    match format {
        OutputFormat::Text => print!("{}", registry.report()),
        OutputFormat::Json => eprint!("{}", registry.report()),
    }

    if !quiescent {
        bail!(
            "objection '{}' still busy after {}",
            objection.name(),
            humantime::format_duration(args.timeout)
        );
    }
    Ok(())
}

/// Poll until the root holds nothing and no drain is in flight
async fn wait_quiescent(objection: &Objection, timeout: Duration) -> bool {
    let mut tick = interval(Duration::from_millis(5));
    tokio::time::timeout(timeout, async {
        while !objection.is_quiescent() {
            tick.tick().await;
        }
    })
    .await
    .is_ok()
}
