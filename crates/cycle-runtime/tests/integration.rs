// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: end-to-end cycle execution.
//!
//! These tests exercise the complete flow from blob parsing → binding →
//! allocation → scheduled ticks, proving that the three crates compose and
//! that the setup failure paths never reach the scheduling phase.

use cycle_runtime::{
    demo, CycleConfig, CyclePipeline, CycleScheduler, InferenceEngine, Interpreter,
    InvokeError, LedSignal, OutputActuator, SchedulerMode, SetupError, TickOutcome,
    TENSOR_ARENA_BYTES,
};
use model_blob::{BlobBuilder, ModelHandle, TensorDescriptor, SCHEMA_VERSION};
use std::cell::Cell;
use std::f32::consts::{PI, TAU};
use std::rc::Rc;
use std::time::Duration;
use tensor_arena::TensorArena;

// ── Helpers ────────────────────────────────────────────────────

/// Actuator recording every signal it observes.
#[derive(Default)]
struct RecordingActuator {
    signals: Vec<LedSignal>,
}

impl OutputActuator for RecordingActuator {
    fn set(&mut self, signal: LedSignal) {
        self.signals.push(signal);
    }
}

/// Engine evaluating `y = sin(x)` directly, with scripted failures and a
/// shared invocation counter.
struct ScriptedEngine {
    invocations: Rc<Cell<u64>>,
    fail_on: Option<u64>,
}

impl ScriptedEngine {
    fn new(fail_on: Option<u64>) -> (Self, Rc<Cell<u64>>) {
        let invocations = Rc::new(Cell::new(0));
        (
            Self {
                invocations: Rc::clone(&invocations),
                fail_on,
            },
            invocations,
        )
    }
}

impl InferenceEngine for ScriptedEngine {
    fn supported_schema_version(&self) -> u16 {
        SCHEMA_VERSION
    }

    fn scratch_bytes(&self, _model: &ModelHandle<'_>) -> usize {
        8
    }

    fn invoke(
        &mut self,
        model: &ModelHandle<'_>,
        input: &[u8],
        _scratch: &mut [u8],
        output: &mut [u8],
    ) -> Result<(), InvokeError> {
        self.invocations.set(self.invocations.get() + 1);
        if Some(self.invocations.get()) == self.fail_on {
            return Err(InvokeError::new("scripted failure"));
        }

        let q_in = model.input().quant.unwrap();
        let x = (input[0] as i8 as i32 - q_in.zero_point) as f32 * q_in.scale;
        let y = x.sin();
        let q_out = model.output().quant.unwrap();
        let stored = (y / q_out.scale + q_out.zero_point as f32)
            .round()
            .clamp(-128.0, 127.0) as i8;
        output[0] = stored as u8;
        Ok(())
    }
}

fn sine_config() -> CycleConfig {
    CycleConfig {
        inferences_per_cycle: 100,
        domain_range: TAU,
        enable_timing: false,
        ..Default::default()
    }
}

// ── End-to-End: demo blob + demo engine ────────────────────────

#[test]
fn test_end_to_end_cycle_with_demo_engine() {
    let blob = demo::sine_model_blob();
    let model = ModelHandle::from_bytes(&blob).unwrap();
    let arena = TensorArena::with_bytes(TENSOR_ARENA_BYTES);

    let interpreter = Interpreter::bind(model, arena, demo::SineEngine::new())
        .unwrap()
        .allocate_tensors()
        .unwrap();
    let mut pipeline =
        CyclePipeline::new(interpreter, RecordingActuator::default(), &sine_config()).unwrap();

    let fresh_generator = pipeline.generator().clone();

    // Tick 0: x = 0.000.
    match pipeline.tick() {
        TickOutcome::Actuated(report) => {
            assert_eq!(report.tick, 0);
            assert_eq!(report.x, 0.0);
            assert!(report.y.abs() < 0.05);
        }
        other => panic!("expected actuation, got {other:?}"),
    }

    // Ticks 1..=50: tick 50 lands on x ≈ π.
    let mut x50 = f32::NAN;
    for _ in 1..=50 {
        if let TickOutcome::Actuated(report) = pipeline.tick() {
            x50 = report.x;
        }
    }
    assert!((x50 - PI).abs() < 1e-5, "tick 50 produced x = {x50}");

    // Ticks 51..=99 finish the cycle; tick 100 wraps to x = 0.000 with the
    // generator back in its start state.
    for _ in 51..100 {
        pipeline.tick();
    }
    assert_eq!(pipeline.generator(), &fresh_generator);
    match pipeline.tick() {
        TickOutcome::Actuated(report) => {
            assert_eq!(report.tick, 100);
            assert_eq!(report.x, 0.0);
        }
        other => panic!("expected actuation, got {other:?}"),
    }

    assert_eq!(pipeline.metrics().ticks, 101);
    assert_eq!(pipeline.metrics().invoke_failures, 0);
    assert_eq!(pipeline.metrics().cycles_completed, 1);
}

#[test]
fn test_outputs_track_the_sine_curve() {
    let blob = demo::sine_model_blob();
    let model = ModelHandle::from_bytes(&blob).unwrap();
    let arena = TensorArena::with_bytes(TENSOR_ARENA_BYTES);

    let interpreter = Interpreter::bind(model, arena, demo::SineEngine::new())
        .unwrap()
        .allocate_tensors()
        .unwrap();
    let mut pipeline =
        CyclePipeline::new(interpreter, RecordingActuator::default(), &sine_config()).unwrap();

    for _ in 0..100 {
        match pipeline.tick() {
            TickOutcome::Actuated(report) => {
                assert!(
                    (report.y - report.x.sin()).abs() < 0.05,
                    "tick {}: y = {} for x = {}, sin(x) = {}",
                    report.tick,
                    report.y,
                    report.x,
                    report.x.sin(),
                );
            }
            other => panic!("expected actuation, got {other:?}"),
        }
    }
}

// ── Setup failures never reach the scheduling phase ────────────

#[test]
fn test_schema_mismatch_keeps_tick_count_at_zero() {
    let blob = BlobBuilder::new(
        TensorDescriptor::scalar_i8(1.0, 0),
        TensorDescriptor::scalar_i8(1.0, 0),
    )
    .schema_version(SCHEMA_VERSION + 7)
    .build()
    .unwrap();
    let model = ModelHandle::from_bytes(&blob).unwrap();
    let (engine, invocations) = ScriptedEngine::new(None);

    let result = Interpreter::bind(model, TensorArena::with_bytes(256), engine);
    match result {
        Err(SetupError::SchemaVersionMismatch { found, supported }) => {
            assert_eq!(found, SCHEMA_VERSION + 7);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        Ok(_) => panic!("bind accepted a mismatched schema version"),
        Err(other) => panic!("expected SchemaVersionMismatch, got {other}"),
    }

    // No pipeline exists, so the scheduling phase never started.
    assert_eq!(invocations.get(), 0);
}

#[test]
fn test_undersized_arena_fails_with_shortfall_before_any_invoke() {
    let blob = BlobBuilder::new(
        TensorDescriptor::scalar_i8(1.0, 0),
        TensorDescriptor::scalar_i8(1.0, 0),
    )
    .scratch_hint(4096)
    .build()
    .unwrap();
    let model = ModelHandle::from_bytes(&blob).unwrap();
    let (engine, invocations) = ScriptedEngine::new(None);

    let result = Interpreter::bind(model, TensorArena::with_bytes(1024), engine)
        .unwrap()
        .allocate_tensors();

    match result {
        Err(SetupError::Arena(tensor_arena::ArenaError::Exhausted {
            requested,
            capacity,
            shortfall,
        })) => {
            assert_eq!(capacity, 1024);
            assert!(requested > capacity);
            assert_eq!(shortfall, requested - capacity);
        }
        Ok(_) => panic!("allocation succeeded in an undersized arena"),
        Err(other) => panic!("expected arena exhaustion, got {other}"),
    }

    assert_eq!(invocations.get(), 0, "invoke ran before allocation");
}

// ── Per-tick failure recovery ──────────────────────────────────

#[test]
fn test_fifth_invocation_failure_skips_actuation_once() {
    let blob = BlobBuilder::new(
        TensorDescriptor::scalar_i8(TAU / 255.0, -128),
        TensorDescriptor::scalar_i8(2.0 / 255.0, 0),
    )
    .build()
    .unwrap();
    let model = ModelHandle::from_bytes(&blob).unwrap();
    let (engine, invocations) = ScriptedEngine::new(Some(5));

    let interpreter = Interpreter::bind(model, TensorArena::with_bytes(256), engine)
        .unwrap()
        .allocate_tensors()
        .unwrap();
    let config = CycleConfig {
        inferences_per_cycle: 10,
        domain_range: TAU,
        enable_timing: false,
        ..Default::default()
    };
    let mut pipeline =
        CyclePipeline::new(interpreter, RecordingActuator::default(), &config).unwrap();

    let mut expected = Vec::new();
    for tick in 0..10u64 {
        match pipeline.tick() {
            TickOutcome::Actuated(report) => {
                assert_ne!(report.tick, 4, "the failed tick must not actuate");
                expected.push(report);
            }
            TickOutcome::Skipped { tick: failed, .. } => {
                assert_eq!(failed, 4, "only the 5th invocation was scripted to fail");
                assert_eq!(tick, 4);
            }
        }
    }

    // Exactly one invoke per tick — the failure was not retried.
    assert_eq!(invocations.get(), 10);
    assert_eq!(pipeline.metrics().ticks, 10);
    assert_eq!(pipeline.metrics().actuations, 9);
    assert_eq!(pipeline.metrics().invoke_failures, 1);

    // The actuator observed the nine successful values in generation order.
    let observed = &pipeline.actuator().signals;
    assert_eq!(observed.len(), 9);
    for (signal, report) in observed.iter().zip(&expected) {
        let mapped = cycle_runtime::OutputMap::default().apply(report.y);
        assert_eq!(*signal, mapped);
    }
}

// ── Scheduler modes drive the same pipeline ────────────────────

#[test]
fn test_periodic_schedule_end_to_end() {
    let blob = demo::sine_model_blob();
    let model = ModelHandle::from_bytes(&blob).unwrap();
    let arena = TensorArena::with_bytes(TENSOR_ARENA_BYTES);

    let interpreter = Interpreter::bind(model, arena, demo::SineEngine::new())
        .unwrap()
        .allocate_tensors()
        .unwrap();
    let config = CycleConfig {
        inferences_per_cycle: 10,
        domain_range: TAU,
        scheduler: "periodic".into(),
        tick_period_ms: 1,
        max_ticks: Some(20),
        enable_timing: false,
        ..Default::default()
    };
    let mut pipeline =
        CyclePipeline::new(interpreter, RecordingActuator::default(), &config).unwrap();

    config.create_scheduler().unwrap().run(&mut pipeline);

    assert_eq!(pipeline.metrics().ticks, 20);
    assert_eq!(pipeline.metrics().cycles_completed, 2);
    assert_eq!(pipeline.actuator().signals.len(), 20);
}

#[test]
fn test_one_shot_schedule_matches_tight_loop() {
    let run = |mode: SchedulerMode| -> Vec<LedSignal> {
        let blob = demo::sine_model_blob();
        let model = ModelHandle::from_bytes(&blob).unwrap();
        let arena = TensorArena::with_bytes(TENSOR_ARENA_BYTES);
        let interpreter = Interpreter::bind(model, arena, demo::SineEngine::new())
            .unwrap()
            .allocate_tensors()
            .unwrap();
        let config = CycleConfig {
            inferences_per_cycle: 8,
            domain_range: TAU,
            enable_timing: false,
            ..Default::default()
        };
        let mut pipeline =
            CyclePipeline::new(interpreter, RecordingActuator::default(), &config).unwrap();
        CycleScheduler::new(mode, Some(16)).run(&mut pipeline);
        pipeline.into_actuator().signals
    };

    let tight = run(SchedulerMode::TightLoop);
    let one_shot = run(SchedulerMode::OneShot(Duration::from_millis(1)));
    assert_eq!(tight, one_shot);
    assert_eq!(tight.len(), 16);
}
