// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for arena management.

/// Errors that can occur while sizing or carving the tensor arena.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// The requested regions do not fit in the arena.
    #[error("arena exhausted: requested {requested} bytes, but capacity is {capacity} ({shortfall} bytes short)")]
    Exhausted {
        requested: usize,
        capacity: usize,
        shortfall: usize,
    },

    /// A zero-sized region was requested.
    #[error("cannot carve a zero-sized region")]
    ZeroSizedRegion,

    /// A capacity string could not be parsed.
    #[error("invalid capacity: {0}")]
    InvalidCapacity(String),
}
