// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The per-tick inference pipeline.
//!
//! [`CyclePipeline`] is the single explicit context value the scheduler
//! owns: interpreter, quantization adapter, input generator, actuator, and
//! metrics, with no state at process scope. One [`CyclePipeline::tick`]
//! runs the full chain
//!
//! ```text
//! generate x → encode → invoke → decode y → actuate → log
//! ```
//!
//! with exactly one `invoke` per tick. A failed invocation skips decode and
//! actuation for that tick — a stale output buffer is never treated as
//! valid — and the next tick proceeds with the next generated value.

use crate::{
    Allocated, CycleConfig, CycleGenerator, CycleMetrics, InferenceEngine, InvokeError,
    Interpreter, OutputActuator, OutputMap, Quantizer, SetupError,
};
use std::fmt;
use std::time::{Duration, Instant};

/// One successful tick's values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Zero-based tick index.
    pub tick: u64,
    /// Generated input value.
    pub x: f32,
    /// Decoded model output.
    pub y: f32,
    /// Time spent inside `invoke`.
    pub elapsed: Duration,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x_value: {:>6.3}, y_value: {:>6.3}", self.x, self.y)
    }
}

/// The result of one scheduler tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// The output value reached the actuator.
    Actuated(TickReport),
    /// The engine failed; actuation was skipped for this tick.
    Skipped {
        /// Zero-based tick index.
        tick: u64,
        /// Generated input value that was consumed by the failed attempt.
        x: f32,
        /// The engine's report.
        error: InvokeError,
    },
}

/// Everything one tick needs, owned in one place.
pub struct CyclePipeline<'m, E: InferenceEngine, A: OutputActuator> {
    interpreter: Interpreter<'m, E, Allocated>,
    quantizer: Quantizer,
    generator: CycleGenerator,
    actuator: A,
    map: OutputMap,
    metrics: CycleMetrics,
    emit_timing: bool,
}

impl<'m, E: InferenceEngine, A: OutputActuator> CyclePipeline<'m, E, A> {
    /// Assembles the pipeline from an allocated interpreter.
    ///
    /// Reads scale/zero-point once from the bound descriptors; they are
    /// immutable from here on.
    pub fn new(
        interpreter: Interpreter<'m, E, Allocated>,
        actuator: A,
        config: &CycleConfig,
    ) -> Result<Self, SetupError> {
        config.validate()?;

        let quantizer = Quantizer::from_descriptors(
            interpreter.input_descriptor(),
            interpreter.output_descriptor(),
        )?;
        let generator = CycleGenerator::new(config.cycle_steps()?, config.domain_range);

        Ok(Self {
            interpreter,
            quantizer,
            generator,
            actuator,
            map: config.output_map,
            metrics: CycleMetrics::default(),
            emit_timing: config.enable_timing,
        })
    }

    /// Runs one tick: generate, encode, invoke, decode, actuate, log.
    ///
    /// The tick counter advances whether or not the invocation succeeds;
    /// a failure only suppresses decode and actuation.
    pub fn tick(&mut self) -> TickOutcome {
        let tick = self.metrics.ticks;
        let x = self.generator.next();

        self.quantizer
            .encode_into(x, self.interpreter.input_buffer_mut());

        let started = Instant::now();
        let result = self.interpreter.invoke();
        let elapsed = started.elapsed();

        let outcome = match result {
            Err(error) => {
                self.metrics.record_invoke_failure(elapsed);
                tracing::warn!("tick {tick} (x = {x:.3}): {error}; skipping actuation");
                TickOutcome::Skipped { tick, x, error }
            }
            Ok(()) => {
                let y = self.quantizer.decode_from(self.interpreter.output_buffer());
                self.actuator.set(self.map.apply(y));
                self.metrics.record_actuation(elapsed);

                let report = TickReport {
                    tick,
                    x,
                    y,
                    elapsed,
                };
                tracing::info!("{report}");
                if self.emit_timing {
                    tracing::info!("The time taken was {} microseconds", elapsed.as_micros());
                }
                TickOutcome::Actuated(report)
            }
        };

        if self.generator.at_cycle_start() {
            self.metrics.record_cycle_completed();
        }

        outcome
    }

    /// Returns the run's metrics so far.
    pub fn metrics(&self) -> &CycleMetrics {
        &self.metrics
    }

    /// Returns the input generator.
    pub fn generator(&self) -> &CycleGenerator {
        &self.generator
    }

    /// Returns the injected actuator.
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Consumes the pipeline and returns the actuator.
    pub fn into_actuator(self) -> A {
        self.actuator
    }

    /// Returns the arena layout summary for setup diagnostics.
    pub fn layout_summary(&self) -> String {
        self.interpreter.layout_summary()
    }
}

impl<'m, E: InferenceEngine, A: OutputActuator> fmt::Debug for CyclePipeline<'m, E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CyclePipeline")
            .field("ticks", &self.metrics.ticks)
            .field("generator_count", &self.generator.count())
            .finish()
    }
}
