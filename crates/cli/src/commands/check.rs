// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `objection check <scenario>` - Validate a scenario without running it

use crate::scenario::Scenario;
use anyhow::{bail, Result};
use std::path::PathBuf;

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Scenario file (TOML)
    pub scenario: PathBuf,
}

pub fn handle(args: CheckArgs) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;

    let mut problems = scenario.validate_tree();
    if problems.is_empty() {
        problems = scenario.validate_balances();
    }
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("error: {}", problem);
        }
        bail!(
            "{} is invalid ({} problem{})",
            args.scenario.display(),
            problems.len(),
            if problems.len() == 1 { "" } else { "s" }
        );
    }

    println!(
        "{}: ok ({} owners, {} steps)",
        args.scenario.display(),
        scenario.owners.len(),
        scenario.steps.len()
    );
    Ok(())
}
