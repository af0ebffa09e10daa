// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The embedded demo resource and a reference engine.
//!
//! Real deployments link a pretrained network and an external interpreter;
//! neither belongs to this repository. For the demo binary, benches, and
//! tests, this module stands in for both: [`sine_model_blob`] assembles the
//! compiled-in model resource (a quantized sine table as the weight
//! payload), and [`SineEngine`] evaluates it through the same
//! [`InferenceEngine`] seam a production interpreter would use.

use crate::{InferenceEngine, InvokeError};
use model_blob::{BlobBuilder, ElementKind, ModelHandle, QuantParams, TensorDescriptor};
use std::f32::consts::TAU;

/// Entries in the demo payload's sine table.
pub const SINE_LUT_LEN: usize = 256;

/// Assembles the demo model blob.
///
/// Input: quantized scalar covering one full period `[0, 2π]`
/// (`scale = 2π/255`, `zero_point = -128`). Output: quantized scalar
/// covering `[-1, 1]` (`scale = 2/255`, `zero_point = 0`). The payload is a
/// 256-entry `i8` sine table the engine samples.
pub fn sine_model_blob() -> Vec<u8> {
    let lut: Vec<u8> = (0..SINE_LUT_LEN)
        .map(|i| {
            let phase = i as f32 / SINE_LUT_LEN as f32 * TAU;
            (phase.sin() * 127.0).round() as i8 as u8
        })
        .collect();

    BlobBuilder::new(
        TensorDescriptor::scalar_i8(TAU / 255.0, -128),
        TensorDescriptor::scalar_i8(2.0 / 255.0, 0),
    )
    .scratch_hint(16)
    .payload(lut)
    .build()
    .expect("demo blob descriptors are statically valid")
}

/// Reference engine evaluating the demo blob.
///
/// Samples the payload's sine table with linear interpolation. Handles both
/// quantized and float tensor descriptors, reading scale/zero-point from
/// the bound model the way an interpreter kernel would.
#[derive(Debug, Default)]
pub struct SineEngine;

impl SineEngine {
    /// Creates the engine.
    pub fn new() -> Self {
        Self
    }
}

impl InferenceEngine for SineEngine {
    fn supported_schema_version(&self) -> u16 {
        model_blob::SCHEMA_VERSION
    }

    fn scratch_bytes(&self, _model: &ModelHandle<'_>) -> usize {
        // One staging slot for the dequantized sample.
        4
    }

    fn invoke(
        &mut self,
        model: &ModelHandle<'_>,
        input: &[u8],
        scratch: &mut [u8],
        output: &mut [u8],
    ) -> Result<(), InvokeError> {
        let lut = model.payload();
        if lut.len() != SINE_LUT_LEN {
            return Err(InvokeError::new(format!(
                "payload is {} bytes, expected a {SINE_LUT_LEN}-entry table",
                lut.len(),
            )));
        }

        let x = read_scalar(model.input(), input);
        scratch[..4].copy_from_slice(&x.to_le_bytes());

        // Sample the table with linear interpolation; sine is 2π-periodic,
        // so the phase wraps.
        let position = x.rem_euclid(TAU) / TAU * SINE_LUT_LEN as f32;
        let index = position as usize % SINE_LUT_LEN;
        let fraction = position - position.floor();
        let a = lut[index] as i8 as f32 / 127.0;
        let b = lut[(index + 1) % SINE_LUT_LEN] as i8 as f32 / 127.0;
        let y = a + (b - a) * fraction;

        write_scalar(model.output(), y, output);
        Ok(())
    }
}

fn read_scalar(descriptor: &TensorDescriptor, buf: &[u8]) -> f32 {
    match (descriptor.kind, &descriptor.quant) {
        (ElementKind::I8, Some(QuantParams { scale, zero_point })) => {
            (buf[0] as i8 as i32 - zero_point) as f32 * scale
        }
        _ => {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(&buf[..4]);
            f32::from_le_bytes(bytes)
        }
    }
}

fn write_scalar(descriptor: &TensorDescriptor, value: f32, buf: &mut [u8]) {
    match (descriptor.kind, &descriptor.quant) {
        (ElementKind::I8, Some(QuantParams { scale, zero_point })) => {
            let stored = (value / scale + *zero_point as f32)
                .round()
                .clamp(i8::MIN as f32, i8::MAX as f32) as i8;
            buf[0] = stored as u8;
        }
        _ => buf[..4].copy_from_slice(&value.to_le_bytes()),
    }
}
