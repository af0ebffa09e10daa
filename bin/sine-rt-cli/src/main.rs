// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # sine-rt
//!
//! Command-line interface for the cycle runtime.
//!
//! ## Usage
//! ```bash
//! # Run the demo model for one full cycle
//! sine-rt run --ticks 100
//!
//! # Run a blob from disk on the cooperative queue at a 10 ms cadence
//! sine-rt run --model ./model.sinm --scheduler periodic --period-ms 10
//!
//! # Inspect a blob: version, descriptors, arena estimate
//! sine-rt inspect --model ./model.sinm
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sine-rt",
    about = "Cyclic sine-inference runtime with a static tensor arena",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (CLI arguments override it).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the inference cycle.
    Run {
        /// Path to a model blob; the embedded demo model when omitted.
        #[arg(short, long)]
        model: Option<std::path::PathBuf>,

        /// Scheduler mode: tight-loop, periodic, one-shot.
        #[arg(short, long)]
        scheduler: Option<String>,

        /// Tick budget; 0 runs forever.
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Tick cadence in milliseconds for the queue-driven modes.
        #[arg(long)]
        period_ms: Option<u64>,

        /// Arena capacity (e.g. "5144", "8K").
        #[arg(long)]
        arena: Option<String>,
    },

    /// Inspect a model blob: version, descriptors, and arena estimate.
    Inspect {
        /// Path to a model blob; the embedded demo model when omitted.
        #[arg(short, long)]
        model: Option<std::path::PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            model,
            scheduler,
            ticks,
            period_ms,
            arena,
        } => commands::run::execute(cli.config, model, scheduler, ticks, period_ms, arena),
        Commands::Inspect { model } => commands::inspect::execute(model),
    }
}
