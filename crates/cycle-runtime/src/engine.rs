// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The inference engine seam.
//!
//! The numerical work — operator kernels, graph evaluation, weight decoding —
//! lives in an external engine. The runtime only drives it: it binds the
//! engine to a model and an arena, hands it buffer views per invocation, and
//! reacts to its verdict. [`InferenceEngine`] is that boundary.

use model_blob::ModelHandle;

/// A single failed engine invocation.
///
/// Per-tick and recoverable: the scheduler logs it, skips actuation for the
/// tick, and moves on to the next generated value. It is never retried with
/// the same input.
#[derive(Debug, Clone, thiserror::Error)]
#[error("engine invocation failed: {reason}")]
pub struct InvokeError {
    reason: String,
}

impl InvokeError {
    /// Creates an invocation error with the engine's reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the engine-reported reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// The external interpreter evaluating the model graph.
///
/// Implementations are bound once at startup via
/// [`crate::Interpreter::bind`] and invoked synchronously, one call at a
/// time, from a single thread. One `invoke` consumes exactly the current
/// contents of `input` and overwrites `output`; on `Err` the output buffer
/// contents are unspecified and the caller must not decode them.
pub trait InferenceEngine {
    /// The model schema version this engine evaluates.
    ///
    /// Binding a model that declares any other version fails fatally at
    /// setup — there is no fallback model.
    fn supported_schema_version(&self) -> u16;

    /// Bytes of working memory the engine needs beyond the input/output
    /// tensor buffers, for the given model.
    ///
    /// Combined with the blob's own scratch hint (the larger wins) when the
    /// arena is carved.
    fn scratch_bytes(&self, model: &ModelHandle<'_>) -> usize;

    /// Evaluates the model graph over the given buffer views.
    ///
    /// Blocking for the duration of the evaluation. The three views are
    /// disjoint regions of the tensor arena, sized from the model's
    /// descriptors and the scratch declaration.
    fn invoke(
        &mut self,
        model: &ModelHandle<'_>,
        input: &[u8],
        scratch: &mut [u8],
        output: &mut [u8],
    ) -> Result<(), InvokeError>;
}
