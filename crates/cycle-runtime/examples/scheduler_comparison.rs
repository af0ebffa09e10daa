// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: Compare scheduling models over the same inference pipeline.
//!
//! Demonstrates that all three scheduler modes drive identical tick
//! sequences — the mode only decides when ticks run, never what they
//! compute.
//!
//! ```bash
//! cargo run -p cycle-runtime --example scheduler_comparison
//! ```

use cycle_runtime::{
    demo, CycleConfig, CyclePipeline, CycleScheduler, Interpreter, LedSignal,
    OutputActuator, SchedulerMode, TENSOR_ARENA_BYTES,
};
use model_blob::ModelHandle;
use std::time::{Duration, Instant};
use tensor_arena::TensorArena;

struct NullActuator;

impl OutputActuator for NullActuator {
    fn set(&mut self, _signal: LedSignal) {}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing.
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let modes = [
        ("tight-loop", SchedulerMode::TightLoop),
        ("periodic 2ms", SchedulerMode::Periodic(Duration::from_millis(2))),
        ("one-shot 2ms", SchedulerMode::OneShot(Duration::from_millis(2))),
    ];

    println!(
        "{:<16} {:>8} {:>10} {:>14}",
        "Mode", "Ticks", "Cycles", "Wall time",
    );
    println!("{}", "-".repeat(52));

    for (name, mode) in modes {
        let blob = demo::sine_model_blob();
        let model = ModelHandle::from_bytes(&blob)?;
        let arena = TensorArena::with_bytes(TENSOR_ARENA_BYTES);

        let interpreter = Interpreter::bind(model, arena, demo::SineEngine::new())?
            .allocate_tensors()?;
        let config = CycleConfig {
            inferences_per_cycle: 25,
            enable_timing: false,
            ..Default::default()
        };
        let mut pipeline = CyclePipeline::new(interpreter, NullActuator, &config)?;

        let started = Instant::now();
        CycleScheduler::new(mode, Some(50)).run(&mut pipeline);
        let elapsed = started.elapsed();

        let metrics = pipeline.metrics();
        println!(
            "{:<16} {:>8} {:>10} {:>12.1}ms",
            name,
            metrics.ticks,
            metrics.cycles_completed,
            elapsed.as_secs_f64() * 1000.0,
        );
    }

    Ok(())
}
