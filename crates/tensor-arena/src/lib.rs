// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-arena
//!
//! A fixed-capacity arena for tensor and interpreter bookkeeping storage on
//! memory-constrained targets.
//!
//! # Key Components
//!
//! - [`ArenaCapacity`] — the arena's fixed size, with human-readable parsing
//!   (`"8K"`, `"5144"`, etc.).
//! - [`TensorArena`] — the zero-filled region itself. Carved into aligned
//!   sub-regions exactly once; there is no resize and no dynamic allocation
//!   afterwards.
//! - [`AllocatedArena`] — the carved arena: fixed disjoint regions with
//!   shared/mutable views and a layout summary for setup diagnostics.
//!
//! # Ownership Model
//!
//! ```text
//! TensorArena::carve(&[input, output, scratch])
//!       │  consumes the arena
//!       ▼
//!   AllocatedArena  ──► region views for the interpreter
//! ```
//!
//! `carve` consumes the `TensorArena`, so allocation is structurally a
//! one-time step: there is no way to re-carve or grow the region set after
//! setup. If the layout does not fit, `carve` fails with the exact byte
//! shortfall and the arena is dropped — nothing downstream can observe a
//! partially allocated state.
//!
//! # Example
//! ```
//! use tensor_arena::{ArenaCapacity, TensorArena};
//!
//! let arena = TensorArena::new(ArenaCapacity::parse("1K").unwrap());
//! let carved = arena.carve(&[4, 4, 512]).unwrap();
//! assert_eq!(carved.num_regions(), 3);
//! ```

mod arena;
mod capacity;
mod error;

pub use arena::{required_bytes, AllocatedArena, TensorArena, REGION_ALIGN};
pub use capacity::ArenaCapacity;
pub use error::ArenaError;
