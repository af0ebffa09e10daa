// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `sine-rt run` command: drive the inference cycle.
//!
//! Walks the type-state setup pipeline:
//! ```text
//! ModelHandle::from_bytes → Interpreter::bind → allocate_tensors → run
//! ```
//! Setup failures (schema mismatch, arena exhaustion) exit here with a
//! diagnostic — the scheduler is never started in that case.

use cycle_runtime::{
    demo::SineEngine, ConsoleActuator, CycleConfig, CyclePipeline, Interpreter,
};
use model_blob::ModelHandle;
use std::path::PathBuf;
use tensor_arena::TensorArena;

pub fn execute(
    config_path: Option<PathBuf>,
    model: Option<PathBuf>,
    scheduler: Option<String>,
    ticks: Option<u64>,
    period_ms: Option<u64>,
    arena: Option<String>,
) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              sine-rt · Cycle Runner                  ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    // ── Configuration ──────────────────────────────────────────
    let mut config = match &config_path {
        Some(path) => CycleConfig::from_file(path)?,
        None => CycleConfig::default(),
    };

    if let Some(mode) = scheduler {
        config.scheduler = mode;
    }
    if let Some(ticks) = ticks {
        config.max_ticks = if ticks == 0 { None } else { Some(ticks) };
    }
    if let Some(period) = period_ms {
        config.tick_period_ms = period;
    }
    if let Some(capacity) = arena {
        config.arena_capacity = capacity;
    }
    config.validate()?;

    println!("  Config:");
    println!(
        "   Model:     {}",
        model
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<embedded demo>".to_string()),
    );
    println!("   Scheduler: {}", config.scheduler);
    println!(
        "   Ticks:     {}",
        config
            .max_ticks
            .map(|t| t.to_string())
            .unwrap_or_else(|| "forever".to_string()),
    );
    println!("   Cycle:     {} steps over {:.4}", config.inferences_per_cycle, config.domain_range);
    println!("   Arena:     {}", config.parse_capacity()?);
    println!();

    // ── Type-State Setup ───────────────────────────────────────
    //
    // Step 1: parse the model resource.
    println!("  [1/3] Parsing model blob...");
    let blob = super::load_blob(model)?;
    let handle = ModelHandle::from_bytes(&blob)?;
    println!("        {}", handle.summary());
    println!();

    // Step 2: bind and allocate — the one-time arena carve.
    println!("  [2/3] Binding engine and allocating tensors...");
    let arena = TensorArena::new(config.parse_capacity()?);
    let interpreter = Interpreter::bind(handle, arena, SineEngine::new())?
        .allocate_tensors()?;
    println!("        {}", interpreter.layout_summary());
    println!();

    // Step 3: schedule the cycle.
    println!("  [3/3] Running...");
    println!();

    let scheduler = config.create_scheduler()?;
    let mut pipeline = CyclePipeline::new(interpreter, ConsoleActuator, &config)?;
    scheduler.run(&mut pipeline);

    println!();
    println!("  Results:");
    println!("   {}", pipeline.metrics().summary());

    Ok(())
}
