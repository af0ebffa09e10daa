// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The cycle scheduler.
//!
//! Drives exactly one pipeline tick per scheduling slot under one of three
//! configured models:
//!
//! - **Tight loop** — back-to-back ticks with no yield point, for devices
//!   with no other concurrent work.
//! - **Periodic** — a recurring task on the cooperative [`crate::RunQueue`]
//!   at a fixed cadence.
//! - **One-shot** — a task that reschedules itself one period after each
//!   run ends.
//!
//! All three guarantee one inference per tick, a monotonic tick count, and
//! actuation in generation order — those properties live in
//! [`crate::CyclePipeline`]; the scheduler only decides *when* ticks run.

use crate::{CyclePipeline, InferenceEngine, OutputActuator, RunQueue, TaskOutcome};
use std::time::Duration;

/// When ticks are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerMode {
    /// Run ticks back to back with no yield point.
    TightLoop,
    /// Recurring run-queue task at a fixed cadence.
    Periodic(Duration),
    /// Run-queue task rescheduling itself after each run.
    OneShot(Duration),
}

/// Drives a [`CyclePipeline`] until its tick budget is spent.
///
/// # Example
/// ```no_run
/// use cycle_runtime::{CycleScheduler, SchedulerMode};
///
/// let scheduler = CycleScheduler::new(SchedulerMode::TightLoop, Some(100));
/// # let _ = scheduler;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CycleScheduler {
    mode: SchedulerMode,
    max_ticks: Option<u64>,
}

impl CycleScheduler {
    /// Creates a scheduler. `max_ticks = None` runs forever.
    pub fn new(mode: SchedulerMode, max_ticks: Option<u64>) -> Self {
        Self { mode, max_ticks }
    }

    /// Returns the configured mode.
    pub fn mode(&self) -> SchedulerMode {
        self.mode
    }

    /// Returns the tick budget.
    pub fn max_ticks(&self) -> Option<u64> {
        self.max_ticks
    }

    /// Runs the pipeline until the tick budget is reached.
    ///
    /// With `max_ticks = None` this never returns — the embedded
    /// forever-loop. The budget is checked before each tick, so a budget of
    /// zero runs nothing.
    pub fn run<E, A>(&self, pipeline: &mut CyclePipeline<'_, E, A>)
    where
        E: InferenceEngine,
        A: OutputActuator,
    {
        tracing::info!(mode = ?self.mode, max_ticks = ?self.max_ticks, "scheduler starting");

        match self.mode {
            SchedulerMode::TightLoop => {
                while !self.budget_spent(pipeline) {
                    pipeline.tick();
                }
            }
            SchedulerMode::Periodic(period) => {
                let budget = *self;
                let mut queue: RunQueue<CyclePipeline<'_, E, A>> = RunQueue::new();
                queue.call_every(period, move |pipeline| budget.queued_tick(pipeline));
                queue.dispatch_forever(pipeline);
            }
            SchedulerMode::OneShot(period) => {
                let budget = *self;
                let mut queue: RunQueue<CyclePipeline<'_, E, A>> = RunQueue::new();
                queue.call(move |pipeline| match budget.queued_tick(pipeline) {
                    TaskOutcome::Done => TaskOutcome::Reschedule(period),
                    stop => stop,
                });
                queue.dispatch_forever(pipeline);
            }
        }

        tracing::info!("scheduler finished: {}", pipeline.metrics().summary());
    }

    /// One queue-driven tick: stop when the budget is spent, tick otherwise.
    fn queued_tick<E, A>(&self, pipeline: &mut CyclePipeline<'_, E, A>) -> TaskOutcome
    where
        E: InferenceEngine,
        A: OutputActuator,
    {
        if self.budget_spent(pipeline) {
            return TaskOutcome::Stop;
        }
        pipeline.tick();
        TaskOutcome::Done
    }

    fn budget_spent<E, A>(&self, pipeline: &CyclePipeline<'_, E, A>) -> bool
    where
        E: InferenceEngine,
        A: OutputActuator,
    {
        self.max_ticks
            .is_some_and(|max| pipeline.metrics().ticks >= max)
    }
}
