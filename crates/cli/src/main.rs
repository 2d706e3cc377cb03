// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! objection - play objection scenarios and watch them drain

mod commands;
mod output;
mod scenario;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, run};

#[derive(Parser)]
#[command(
    name = "objection",
    version,
    about = "Objection simulator - raise, drop and drain an owner tree"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario until the root is quiescent
    Run(run::RunArgs),
    /// Validate a scenario without running it
    Check(check::CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            setup_logging(args.trace);
            run::handle(args).await
        }
        Commands::Check(args) => {
            setup_logging(false);
            check::handle(args)
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`). `--trace` turns
/// on the objection trace target on top of that.
fn setup_logging(trace: bool) {
    use std::io::IsTerminal;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if trace {
        if let Ok(directive) = "objection::trace=info".parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();
}
