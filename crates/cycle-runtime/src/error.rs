// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for runtime setup.
//!
//! Setup errors are unrecoverable: the process must not enter the
//! scheduling phase after any of them. Per-tick engine failures are a
//! separate, recoverable kind — see [`crate::InvokeError`].

/// Fatal errors raised before the scheduling phase starts.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The model blob declares a schema version the engine does not
    /// evaluate. Not recoverable — there is no fallback model.
    #[error("schema version mismatch: model declares version {found}, engine supports version {supported}")]
    SchemaVersionMismatch { found: u16, supported: u16 },

    /// Tensor allocation did not fit in the arena.
    #[error("tensor allocation failed: {0}")]
    Arena(#[from] tensor_arena::ArenaError),

    /// The model blob is malformed.
    #[error("model blob error: {0}")]
    Blob(#[from] model_blob::BlobError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
