// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-capacity arena with one-shot region carving.
//!
//! The [`TensorArena`] is the single memory region from which the
//! interpreter carves all tensor and bookkeeping storage. It:
//!
//! 1. Has a fixed capacity set at construction — there is no resize.
//! 2. Is carved into aligned regions exactly once; `carve` consumes the
//!    arena, so a second allocation pass is a compile error.
//! 3. Rejects layouts that exceed capacity with a diagnostic naming the
//!    shortfall.
//!
//! No allocation happens after the carve: the [`AllocatedArena`] only hands
//! out views into the regions it already owns.

use crate::{ArenaCapacity, ArenaError};
use std::ops::Range;

/// Alignment applied to the start of every carved region.
pub const REGION_ALIGN: usize = 16;

/// Returns the total bytes a layout of `regions` occupies, including
/// alignment padding between regions.
///
/// This is the same computation [`TensorArena::carve`] performs, exposed so
/// callers can estimate a minimum capacity before building an arena.
pub fn required_bytes(regions: &[usize]) -> usize {
    let mut offset = 0usize;
    for &len in regions {
        offset = round_up(offset, REGION_ALIGN) + len;
    }
    offset
}

fn round_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

/// The fixed memory region backing all tensor storage.
///
/// # Example
/// ```
/// use tensor_arena::{ArenaCapacity, TensorArena};
///
/// let arena = TensorArena::new(ArenaCapacity::from_bytes(256));
/// let carved = arena.carve(&[4, 4, 64]).unwrap();
/// assert_eq!(carved.num_regions(), 3);
/// assert!(carved.headroom_bytes() > 0);
/// ```
pub struct TensorArena {
    buf: Box<[u8]>,
}

impl TensorArena {
    /// Creates a zero-filled arena with the given capacity.
    pub fn new(capacity: ArenaCapacity) -> Self {
        Self::with_bytes(capacity.as_bytes())
    }

    /// Creates a zero-filled arena with a raw byte capacity.
    pub fn with_bytes(bytes: usize) -> Self {
        Self {
            buf: vec![0u8; bytes].into_boxed_slice(),
        }
    }

    /// Returns the arena capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Carves the arena into the requested regions, in order.
    ///
    /// Each region starts at a [`REGION_ALIGN`]-aligned offset. Consumes the
    /// arena: carving is a one-time step, and the returned
    /// [`AllocatedArena`] never grows or moves its regions.
    ///
    /// Returns `Err(Exhausted)` if the aligned layout exceeds capacity, and
    /// `Err(ZeroSizedRegion)` if any request is zero bytes.
    pub fn carve(self, requests: &[usize]) -> Result<AllocatedArena, ArenaError> {
        let capacity = self.buf.len();
        let mut regions = Vec::with_capacity(requests.len());
        let mut offset = 0usize;

        for &len in requests {
            if len == 0 {
                return Err(ArenaError::ZeroSizedRegion);
            }
            let start = round_up(offset, REGION_ALIGN);
            regions.push(start..start + len);
            offset = start + len;
        }

        if offset > capacity {
            return Err(ArenaError::Exhausted {
                requested: offset,
                capacity,
                shortfall: offset - capacity,
            });
        }

        tracing::debug!(
            "arena carved: {} regions, {} of {} bytes used",
            regions.len(),
            offset,
            capacity,
        );

        Ok(AllocatedArena {
            buf: self.buf,
            regions,
        })
    }
}

impl std::fmt::Debug for TensorArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TensorArena")
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// An arena that has been carved into its final regions.
///
/// Regions are disjoint, aligned, and fixed for the arena's lifetime.
pub struct AllocatedArena {
    buf: Box<[u8]>,
    regions: Vec<Range<usize>>,
}

impl AllocatedArena {
    /// Returns the arena capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the number of carved regions.
    pub fn num_regions(&self) -> usize {
        self.regions.len()
    }

    /// Returns the byte length of region `index`.
    ///
    /// Region indices are fixed by the `carve` call that built this arena;
    /// indexing past them is a caller bug and panics.
    pub fn region_len(&self, index: usize) -> usize {
        self.regions[index].len()
    }

    /// Returns a shared view of region `index`.
    pub fn region(&self, index: usize) -> &[u8] {
        &self.buf[self.regions[index].clone()]
    }

    /// Returns a mutable view of region `index`.
    pub fn region_mut(&mut self, index: usize) -> &mut [u8] {
        &mut self.buf[self.regions[index].clone()]
    }

    /// Returns mutable views of all regions at once.
    ///
    /// The regions are disjoint by construction, so handing them out
    /// together is safe; alignment padding between regions stays
    /// inaccessible.
    pub fn regions_mut(&mut self) -> Vec<&mut [u8]> {
        let mut views = Vec::with_capacity(self.regions.len());
        let mut rest: &mut [u8] = &mut self.buf;
        let mut consumed = 0usize;

        for range in &self.regions {
            let (_gap, tail) = rest.split_at_mut(range.start - consumed);
            let (region, tail) = tail.split_at_mut(range.end - range.start);
            views.push(region);
            rest = tail;
            consumed = range.end;
        }

        views
    }

    /// Returns the bytes occupied by the layout (end of the last region).
    pub fn used_bytes(&self) -> usize {
        self.regions.last().map(|r| r.end).unwrap_or(0)
    }

    /// Returns the bytes remaining past the last region.
    pub fn headroom_bytes(&self) -> usize {
        self.capacity() - self.used_bytes()
    }

    /// Returns a human-readable layout summary, logged once after setup.
    pub fn summary(&self) -> String {
        let extents: Vec<String> = self
            .regions
            .iter()
            .map(|r| format!("{}..{}", r.start, r.end))
            .collect();
        format!(
            "arena: {} bytes capacity, {} used across {} regions [{}], {} bytes headroom",
            self.capacity(),
            self.used_bytes(),
            self.num_regions(),
            extents.join(", "),
            self.headroom_bytes(),
        )
    }
}

impl std::fmt::Debug for AllocatedArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllocatedArena")
            .field("capacity", &self.capacity())
            .field("num_regions", &self.num_regions())
            .field("used_bytes", &self.used_bytes())
            .finish()
    }
}
