// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # cycle-runtime
//!
//! The orchestration core of a cyclic inference demo: feed a scalar `x`
//! into a pretrained sine model once per tick, read back `y`, and hand an
//! LED intensity/polarity signal to the injected actuator.
//!
//! The numerical work lives in an external engine behind
//! [`InferenceEngine`]; the hardware lives behind [`OutputActuator`]. What
//! this crate owns is the part with actual design decisions:
//!
//! - [`Interpreter`] — binds model + arena + engine with a type-state
//!   setup: schema check at `bind`, one-shot arena carve at
//!   `allocate_tensors`. Setup failures are fatal and structurally prevent
//!   the scheduling phase from starting.
//! - [`Quantizer`] — float passthrough or affine `i8` conversion around
//!   each invocation, parameters read once from the bound descriptors.
//! - [`CycleGenerator`] — the deterministic periodic input sequence.
//! - [`RunQueue`] + [`CycleScheduler`] — single-threaded cooperative
//!   dispatch: a tight forever-loop, a fixed-cadence recurring task, or a
//!   self-rescheduling one-shot, all guaranteeing one inference per tick in
//!   generation order.
//! - [`CyclePipeline`] — the single context value owned by the scheduler;
//!   no state lives at process scope.
//!
//! # Concurrency Model
//! Single-threaded, cooperative, non-preemptive. `invoke` blocks the
//! current task for the duration of the graph evaluation; nothing cancels
//! it and no watchdog is modeled. Periodic tasks keep a fixed cadence and
//! run late without correction when a tick overruns its period.

mod actuator;
mod config;
pub mod demo;
mod engine;
mod error;
mod generator;
mod interpreter;
mod metrics;
mod pipeline;
mod quantizer;
mod queue;
mod scheduler;

pub use actuator::{ConsoleActuator, LedSignal, OutputActuator, OutputMap};
pub use config::{
    CycleConfig, ARENA_HEADROOM_BYTES, MODEL_ARENA_BYTES, TENSOR_ARENA_BYTES,
};
pub use engine::{InferenceEngine, InvokeError};
pub use error::SetupError;
pub use generator::CycleGenerator;
pub use interpreter::{Allocated, BindState, Bound, Interpreter};
pub use metrics::CycleMetrics;
pub use pipeline::{CyclePipeline, TickOutcome, TickReport};
pub use quantizer::{Quantizer, TensorValue};
pub use queue::{RunQueue, TaskOutcome};
pub use scheduler::{CycleScheduler, SchedulerMode};
