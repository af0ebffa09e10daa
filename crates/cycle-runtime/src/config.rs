// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runtime configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! inferences_per_cycle = 100
//! domain_range = 6.2831853
//! scheduler = "periodic"
//! tick_period_ms = 10
//! max_ticks = 1000
//! arena_capacity = "5144"
//! enable_timing = true
//!
//! [output_map]
//! gain = 0.5
//! bias = 0.5
//! ```

use crate::{CycleScheduler, OutputMap, SchedulerMode, SetupError};
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;

/// Arena bytes the compiled sine model needs, measured offline with the
/// recording allocator.
pub const MODEL_ARENA_BYTES: usize = 4468;

/// Fixed headroom on top of the measured requirement: region alignment,
/// interpreter bookkeeping, and a safety margin.
pub const ARENA_HEADROOM_BYTES: usize = 560 + 16 + 100;

/// Default tensor arena capacity.
pub const TENSOR_ARENA_BYTES: usize = MODEL_ARENA_BYTES + ARENA_HEADROOM_BYTES;

/// Configuration for the cycle runtime.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CycleConfig {
    /// Ticks per input cycle; the generator wraps after this many steps.
    #[serde(default = "default_inferences_per_cycle")]
    pub inferences_per_cycle: u32,
    /// Width of the input domain `[0, domain_range)`. Defaults to 2π.
    #[serde(default = "default_domain_range")]
    pub domain_range: f32,
    /// Scheduling model: `"tight-loop"`, `"periodic"`, or `"one-shot"`.
    #[serde(default = "default_scheduler")]
    pub scheduler: String,
    /// Tick cadence for the queue-driven modes, in milliseconds.
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,
    /// Tick budget; `None` runs forever.
    #[serde(default)]
    pub max_ticks: Option<u64>,
    /// Arena capacity (human-readable, e.g. `"5144"` or `"8K"`).
    #[serde(default = "default_arena_capacity")]
    pub arena_capacity: String,
    /// Emit the per-tick timing line.
    #[serde(default = "default_true")]
    pub enable_timing: bool,
    /// Output value → LED signal mapping.
    #[serde(default)]
    pub output_map: OutputMap,
}

fn default_inferences_per_cycle() -> u32 {
    100
}

fn default_domain_range() -> f32 {
    std::f32::consts::TAU
}

fn default_scheduler() -> String {
    "tight-loop".to_string()
}

fn default_tick_period_ms() -> u64 {
    10
}

fn default_arena_capacity() -> String {
    TENSOR_ARENA_BYTES.to_string()
}

fn default_true() -> bool {
    true
}

impl CycleConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SetupError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SetupError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, SetupError> {
        toml::from_str(toml_str)
            .map_err(|e| SetupError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, SetupError> {
        toml::to_string_pretty(self)
            .map_err(|e| SetupError::Config(format!("TOML serialise error: {e}")))
    }

    /// Checks all invariants the rest of the runtime relies on.
    pub fn validate(&self) -> Result<(), SetupError> {
        self.cycle_steps()?;

        if !(self.domain_range.is_finite() && self.domain_range > 0.0) {
            return Err(SetupError::Config(format!(
                "domain_range must be a positive finite value, got {}",
                self.domain_range,
            )));
        }

        if !(self.output_map.gain.is_finite() && self.output_map.gain > 0.0) {
            return Err(SetupError::Config(format!(
                "output_map.gain must be positive so the signal stays monotonic, got {}",
                self.output_map.gain,
            )));
        }

        self.parse_capacity()?;
        self.scheduler_mode()?;
        Ok(())
    }

    /// Returns the cycle period as a non-zero step count.
    pub fn cycle_steps(&self) -> Result<NonZeroU32, SetupError> {
        NonZeroU32::new(self.inferences_per_cycle).ok_or_else(|| {
            SetupError::Config("inferences_per_cycle must be at least 1".into())
        })
    }

    /// Parses the arena capacity string.
    pub fn parse_capacity(&self) -> Result<tensor_arena::ArenaCapacity, SetupError> {
        tensor_arena::ArenaCapacity::parse(&self.arena_capacity).map_err(SetupError::Arena)
    }

    /// Returns the tick cadence for the queue-driven modes.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Resolves the scheduler mode string.
    pub fn scheduler_mode(&self) -> Result<SchedulerMode, SetupError> {
        match self.scheduler.to_lowercase().as_str() {
            "tight-loop" | "tight" => Ok(SchedulerMode::TightLoop),
            "periodic" | "call-every" => {
                self.nonzero_period()?;
                Ok(SchedulerMode::Periodic(self.tick_period()))
            }
            "one-shot" | "oneshot" => {
                self.nonzero_period()?;
                Ok(SchedulerMode::OneShot(self.tick_period()))
            }
            other => Err(SetupError::Config(format!(
                "unknown scheduler '{other}'; expected 'tight-loop', 'periodic', or 'one-shot'"
            ))),
        }
    }

    /// Creates the scheduler specified by this config.
    pub fn create_scheduler(&self) -> Result<CycleScheduler, SetupError> {
        Ok(CycleScheduler::new(self.scheduler_mode()?, self.max_ticks))
    }

    fn nonzero_period(&self) -> Result<(), SetupError> {
        if self.tick_period_ms == 0 {
            return Err(SetupError::Config(
                "tick_period_ms must be at least 1 for queue-driven scheduling".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            inferences_per_cycle: default_inferences_per_cycle(),
            domain_range: default_domain_range(),
            scheduler: default_scheduler(),
            tick_period_ms: default_tick_period_ms(),
            max_ticks: None,
            arena_capacity: default_arena_capacity(),
            enable_timing: default_true(),
            output_map: OutputMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = CycleConfig::default();
        assert_eq!(c.inferences_per_cycle, 100);
        assert!((c.domain_range - std::f32::consts::TAU).abs() < 1e-6);
        assert_eq!(c.scheduler, "tight-loop");
        assert!(c.enable_timing);
        c.validate().unwrap();
    }

    #[test]
    fn test_arena_constants() {
        assert_eq!(TENSOR_ARENA_BYTES, 4468 + 676);
        let c = CycleConfig::default();
        assert_eq!(c.parse_capacity().unwrap().as_bytes(), TENSOR_ARENA_BYTES);
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
inferences_per_cycle = 50
domain_range = 3.14
scheduler = "periodic"
tick_period_ms = 5
max_ticks = 200
arena_capacity = "8K"
enable_timing = false
"#;
        let c = CycleConfig::from_toml(toml).unwrap();
        assert_eq!(c.inferences_per_cycle, 50);
        assert_eq!(c.scheduler, "periodic");
        assert_eq!(c.tick_period_ms, 5);
        assert_eq!(c.max_ticks, Some(200));
        assert_eq!(c.parse_capacity().unwrap().as_bytes(), 8192);
        assert!(!c.enable_timing);
    }

    #[test]
    fn test_from_toml_defaults() {
        let c = CycleConfig::from_toml("").unwrap();
        assert_eq!(c.inferences_per_cycle, 100);
        assert_eq!(c.max_ticks, None);
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = CycleConfig {
            max_ticks: Some(42),
            ..Default::default()
        };
        let toml = c.to_toml().unwrap();
        let back = CycleConfig::from_toml(&toml).unwrap();
        assert_eq!(back.inferences_per_cycle, c.inferences_per_cycle);
        assert_eq!(back.max_ticks, Some(42));
        assert_eq!(back.output_map, c.output_map);
    }

    #[test]
    fn test_scheduler_modes() {
        let mut c = CycleConfig::default();
        assert_eq!(c.scheduler_mode().unwrap(), SchedulerMode::TightLoop);

        c.scheduler = "periodic".into();
        assert_eq!(
            c.scheduler_mode().unwrap(),
            SchedulerMode::Periodic(Duration::from_millis(10)),
        );

        c.scheduler = "one-shot".into();
        assert_eq!(
            c.scheduler_mode().unwrap(),
            SchedulerMode::OneShot(Duration::from_millis(10)),
        );
    }

    #[test]
    fn test_unknown_scheduler_rejected() {
        let c = CycleConfig {
            scheduler: "preemptive".into(),
            ..Default::default()
        };
        assert!(matches!(c.scheduler_mode(), Err(SetupError::Config(_))));
    }

    #[test]
    fn test_zero_period_rejected_for_queue_modes() {
        let c = CycleConfig {
            scheduler: "periodic".into(),
            tick_period_ms: 0,
            ..Default::default()
        };
        assert!(c.scheduler_mode().is_err());

        // A tight loop has no cadence, so a zero period is fine there.
        let c = CycleConfig {
            tick_period_ms: 0,
            ..Default::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let c = CycleConfig {
            inferences_per_cycle: 0,
            ..Default::default()
        };
        assert!(c.validate().is_err());

        let c = CycleConfig {
            domain_range: 0.0,
            ..Default::default()
        };
        assert!(c.validate().is_err());

        let c = CycleConfig {
            domain_range: f32::NAN,
            ..Default::default()
        };
        assert!(c.validate().is_err());

        let c = CycleConfig {
            output_map: OutputMap {
                gain: -0.5,
                bias: 0.5,
            },
            ..Default::default()
        };
        assert!(c.validate().is_err());

        let c = CycleConfig {
            arena_capacity: "lots".into(),
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_create_scheduler() {
        let c = CycleConfig {
            scheduler: "periodic".into(),
            max_ticks: Some(10),
            ..Default::default()
        };
        let s = c.create_scheduler().unwrap();
        assert_eq!(s.max_ticks(), Some(10));
        assert_eq!(s.mode(), SchedulerMode::Periodic(Duration::from_millis(10)));
    }
}
