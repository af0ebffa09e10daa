// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scheduler metrics.
//!
//! [`CycleMetrics`] counts ticks, actuations, failures, and completed
//! cycles, and tracks invoke latency. `invoke` dominates per-tick latency,
//! so its durations are the ones worth watching when tuning the tick period.

use std::time::Duration;

/// Cumulative counters for a scheduler run.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CycleMetrics {
    /// Ticks executed, successful or not. Monotonic.
    pub ticks: u64,
    /// Ticks whose value reached the actuator.
    pub actuations: u64,
    /// Ticks whose invocation failed (actuation skipped).
    pub invoke_failures: u64,
    /// Full input cycles completed.
    pub cycles_completed: u64,
    /// Total time spent inside `invoke`.
    pub total_invoke_duration: Duration,
    /// Longest single invocation.
    pub peak_invoke_duration: Duration,
    /// Most recent invocation.
    pub last_invoke_duration: Duration,
}

impl CycleMetrics {
    /// Records a tick whose output was actuated.
    pub(crate) fn record_actuation(&mut self, invoke_duration: Duration) {
        self.ticks += 1;
        self.actuations += 1;
        self.record_invoke(invoke_duration);
    }

    /// Records a tick whose invocation failed.
    pub(crate) fn record_invoke_failure(&mut self, invoke_duration: Duration) {
        self.ticks += 1;
        self.invoke_failures += 1;
        self.record_invoke(invoke_duration);
    }

    /// Records a completed input cycle.
    pub(crate) fn record_cycle_completed(&mut self) {
        self.cycles_completed += 1;
    }

    fn record_invoke(&mut self, duration: Duration) {
        self.total_invoke_duration += duration;
        self.last_invoke_duration = duration;
        if duration > self.peak_invoke_duration {
            self.peak_invoke_duration = duration;
        }
    }

    /// Returns the mean invocation latency, or zero before the first tick.
    pub fn mean_invoke_duration(&self) -> Duration {
        if self.ticks == 0 {
            return Duration::ZERO;
        }
        self.total_invoke_duration / self.ticks as u32
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Ticks: {} total ({} actuated, {} failed), {} cycles completed, \
             invoke mean {:.1} µs, peak {:.1} µs",
            self.ticks,
            self.actuations,
            self.invoke_failures,
            self.cycles_completed,
            self.mean_invoke_duration().as_secs_f64() * 1e6,
            self.peak_invoke_duration.as_secs_f64() * 1e6,
        )
    }
}
