// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The interpreter binding with type-state–enforced setup.
//!
//! ```text
//! Interpreter::bind(model, arena, engine)      — schema check
//!     │
//!     ▼
//! Interpreter<Bound>
//!     │  .allocate_tensors()                   — one-shot arena carve
//!     ▼
//! Interpreter<Allocated>                       — buffers + invoke
//! ```
//!
//! Each transition consumes the old value, so allocation cannot run twice
//! and no tensor buffer is reachable before it succeeds. When either setup
//! step fails, the `Allocated` state is never constructed — there is no way
//! to limp into the scheduling phase with an under-allocated arena.

use crate::{InferenceEngine, InvokeError, SetupError};
use model_blob::{ModelHandle, TensorDescriptor};
use tensor_arena::{AllocatedArena, TensorArena};

// ── Type-state markers ─────────────────────────────────────────

/// Model and arena are bound; tensors are not yet allocated.
#[derive(Debug)]
pub struct Bound;

/// Tensors are allocated; the interpreter can be invoked.
#[derive(Debug)]
pub struct Allocated;

/// Sealed trait for binding states.
pub trait BindState: std::fmt::Debug {}
impl BindState for Bound {}
impl BindState for Allocated {}

// Arena region indices, fixed by the carve order in `allocate_tensors`.
const REGION_INPUT: usize = 0;
const REGION_OUTPUT: usize = 1;
const REGION_SCRATCH: usize = 2;

// ── Interpreter ────────────────────────────────────────────────

/// The bound interpreter: one engine, one model, one arena.
///
/// `S` is a type-state marker enforcing the setup ordering at compile time.
/// You cannot call `.invoke()` before `.allocate_tensors()` — the compiler
/// catches it.
///
/// # Example
/// ```no_run
/// use cycle_runtime::{demo, Interpreter};
/// use model_blob::ModelHandle;
/// use tensor_arena::TensorArena;
///
/// # fn example() -> Result<(), cycle_runtime::SetupError> {
/// let blob = demo::sine_model_blob();
/// let model = ModelHandle::from_bytes(&blob)?;
/// let arena = TensorArena::with_bytes(cycle_runtime::TENSOR_ARENA_BYTES);
///
/// let mut interpreter = Interpreter::bind(model, arena, demo::SineEngine::new())?
///     .allocate_tensors()?;
/// interpreter.input_buffer_mut()[0] = 0;
/// interpreter.invoke().map_err(|e| cycle_runtime::SetupError::Config(e.to_string()))?;
/// # Ok(())
/// # }
/// ```
pub struct Interpreter<'m, E, S: BindState = Bound> {
    model: ModelHandle<'m>,
    engine: E,
    _state: std::marker::PhantomData<S>,
    // Fields populated as the binding transitions through states:
    arena: Option<TensorArena>,
    allocated: Option<AllocatedArena>,
}

// ── bind: schema check ─────────────────────────────────────────

impl<'m, E: InferenceEngine> Interpreter<'m, E, Bound> {
    /// Binds the model and arena to the engine.
    ///
    /// Fails with [`SetupError::SchemaVersionMismatch`] when the blob's
    /// declared schema version is not the one the engine evaluates.
    pub fn bind(
        model: ModelHandle<'m>,
        arena: TensorArena,
        engine: E,
    ) -> Result<Self, SetupError> {
        let found = model.schema_version();
        let supported = engine.supported_schema_version();
        if found != supported {
            return Err(SetupError::SchemaVersionMismatch { found, supported });
        }

        tracing::info!("{}", model.summary());
        tracing::info!("arena bound: {} bytes capacity", arena.capacity());

        Ok(Self {
            model,
            engine,
            _state: std::marker::PhantomData,
            arena: Some(arena),
            allocated: None,
        })
    }

    /// Carves the arena into input/output/scratch regions.
    ///
    /// The one-time allocation step: consumes the binding and returns it in
    /// the `Allocated` state. The scratch region is sized to the larger of
    /// the engine's declaration and the blob's hint.
    ///
    /// Fails with [`SetupError::Arena`] when the layout exceeds capacity;
    /// the error names the exact byte shortfall.
    pub fn allocate_tensors(mut self) -> Result<Interpreter<'m, E, Allocated>, SetupError> {
        let arena = self.arena.take().expect("arena present in Bound state");

        let input_bytes = self.model.input().byte_len();
        let output_bytes = self.model.output().byte_len();
        // The carve rejects empty regions; an engine that wants no scratch
        // still gets one byte.
        let scratch_bytes = self
            .engine
            .scratch_bytes(&self.model)
            .max(self.model.scratch_hint())
            .max(1);

        let allocated = arena.carve(&[input_bytes, output_bytes, scratch_bytes])?;
        tracing::info!("{}", allocated.summary());

        Ok(Interpreter {
            model: self.model,
            engine: self.engine,
            _state: std::marker::PhantomData,
            arena: None,
            allocated: Some(allocated),
        })
    }
}

// ── Allocated: buffers and invoke ──────────────────────────────

impl<'m, E: InferenceEngine> Interpreter<'m, E, Allocated> {
    /// Returns the bound model handle.
    pub fn model(&self) -> &ModelHandle<'m> {
        &self.model
    }

    /// Returns the bound input tensor descriptor.
    pub fn input_descriptor(&self) -> &TensorDescriptor {
        self.model.input()
    }

    /// Returns the bound output tensor descriptor.
    pub fn output_descriptor(&self) -> &TensorDescriptor {
        self.model.output()
    }

    /// Returns the input tensor buffer for writing the next sample.
    pub fn input_buffer_mut(&mut self) -> &mut [u8] {
        self.arena_mut().region_mut(REGION_INPUT)
    }

    /// Returns the output tensor buffer.
    ///
    /// Only meaningful after a successful [`Self::invoke`]; after a failed
    /// one the contents are unspecified.
    pub fn output_buffer(&self) -> &[u8] {
        self.arena_ref().region(REGION_OUTPUT)
    }

    /// Returns the arena layout summary for setup diagnostics.
    pub fn layout_summary(&self) -> String {
        self.arena_ref().summary()
    }

    /// Evaluates the model over the current input buffer contents.
    ///
    /// Synchronous and blocking; exactly one evaluation per call. On `Err`
    /// the engine reported failure and the output buffer must not be
    /// decoded. The binding never retries on its own — policy belongs to
    /// the caller.
    pub fn invoke(&mut self) -> Result<(), InvokeError> {
        let arena = self
            .allocated
            .as_mut()
            .expect("arena carved in Allocated state");

        let [input, output, scratch]: [&mut [u8]; 3] = arena
            .regions_mut()
            .try_into()
            .expect("arena carved into three regions");

        self.engine.invoke(&self.model, input, scratch, output)
    }

    // ── Private helpers ────────────────────────────────────────

    fn arena_ref(&self) -> &AllocatedArena {
        self.allocated
            .as_ref()
            .expect("arena carved in Allocated state")
    }

    fn arena_mut(&mut self) -> &mut AllocatedArena {
        self.allocated
            .as_mut()
            .expect("arena carved in Allocated state")
    }
}

impl<'m, E, S: BindState> std::fmt::Debug for Interpreter<'m, E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("state", &std::any::type_name::<S>())
            .field("schema_version", &self.model.schema_version())
            .field("allocated", &self.allocated.is_some())
            .finish()
    }
}
