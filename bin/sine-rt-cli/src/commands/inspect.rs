// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `sine-rt inspect` command: decode a blob without running it.

use cycle_runtime::TENSOR_ARENA_BYTES;
use model_blob::ModelHandle;
use std::path::PathBuf;

pub fn execute(model: Option<PathBuf>) -> anyhow::Result<()> {
    let blob = super::load_blob(model)?;
    let handle = ModelHandle::from_bytes(&blob)?;

    println!("  Model Blob:");
    println!("   Schema version: {}", handle.schema_version());
    println!("   Input tensor:   {}", handle.input().summary());
    println!("   Output tensor:  {}", handle.output().summary());
    println!("   Scratch hint:   {} B", handle.scratch_hint());
    println!("   Payload:        {} B", handle.payload().len());
    println!();

    // Minimum arena for this blob, assuming the engine needs no more
    // scratch than the blob hints at.
    let minimum = tensor_arena::required_bytes(&[
        handle.input().byte_len(),
        handle.output().byte_len(),
        handle.scratch_hint().max(1),
    ]);

    println!("  Arena Estimate:");
    println!("   Minimum layout: {minimum} B");
    println!("   Default arena:  {TENSOR_ARENA_BYTES} B");
    if minimum > TENSOR_ARENA_BYTES {
        println!("   Warning: this blob does not fit the default arena");
    } else {
        println!("   Headroom:       {} B", TENSOR_ARENA_BYTES - minimum);
    }

    Ok(())
}
