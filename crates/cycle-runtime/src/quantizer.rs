// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Quantization adapter between domain values and tensor storage.
//!
//! The adapter is built once from the bound input/output descriptors after
//! setup; scale and zero point are immutable for the process lifetime (one
//! fixed model). Float tensors pass through unchanged; quantized `i8`
//! tensors use the affine mapping
//!
//! ```text
//! encode(x) = round(x / scale + zero_point), clamped to [-128, 127]
//! decode(v) = (v - zero_point) * scale
//! ```

use crate::SetupError;
use model_blob::{ElementKind, TensorDescriptor};

/// A scalar in its tensor storage representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TensorValue {
    /// Raw 32-bit float storage.
    F32(f32),
    /// Quantized 8-bit storage.
    I8(i8),
}

/// Per-tensor storage codec.
#[derive(Debug, Clone, Copy)]
enum Codec {
    Float,
    Affine { scale: f32, zero_point: i32 },
}

impl Codec {
    fn from_descriptor(
        descriptor: &TensorDescriptor,
        tensor: &'static str,
    ) -> Result<Self, SetupError> {
        match (descriptor.kind, &descriptor.quant) {
            (ElementKind::F32, None) => Ok(Codec::Float),
            (ElementKind::I8, Some(q)) => Ok(Codec::Affine {
                scale: q.scale,
                zero_point: q.zero_point,
            }),
            _ => Err(SetupError::Config(format!(
                "{tensor} tensor pairs {} storage with {} quantization parameters",
                descriptor.kind.as_str(),
                if descriptor.quant.is_some() {
                    "present"
                } else {
                    "absent"
                },
            ))),
        }
    }

    fn encode(self, x: f32) -> TensorValue {
        match self {
            Codec::Float => TensorValue::F32(x),
            Codec::Affine { scale, zero_point } => {
                let unclamped = (x / scale + zero_point as f32).round();
                TensorValue::I8(unclamped.clamp(i8::MIN as f32, i8::MAX as f32) as i8)
            }
        }
    }

    fn decode(self, value: TensorValue) -> f32 {
        match (self, value) {
            // A float value is already on the real line regardless of codec.
            (_, TensorValue::F32(v)) => v,
            (Codec::Float, TensorValue::I8(v)) => v as f32,
            (Codec::Affine { scale, zero_point }, TensorValue::I8(v)) => {
                (v as i32 - zero_point) as f32 * scale
            }
        }
    }
}

/// Converts domain values to and from the bound tensors' representation.
#[derive(Debug, Clone, Copy)]
pub struct Quantizer {
    input: Codec,
    output: Codec,
}

impl Quantizer {
    /// Builds the adapter from the bound input/output descriptors.
    ///
    /// Fails if a descriptor pairs its element kind and quantization
    /// parameters inconsistently (blob validation normally rules this out).
    pub fn from_descriptors(
        input: &TensorDescriptor,
        output: &TensorDescriptor,
    ) -> Result<Self, SetupError> {
        Ok(Self {
            input: Codec::from_descriptor(input, "input")?,
            output: Codec::from_descriptor(output, "output")?,
        })
    }

    /// Encodes a domain value into the input tensor's representation.
    pub fn encode(&self, x: f32) -> TensorValue {
        self.input.encode(x)
    }

    /// Decodes an output tensor value back to the real line.
    pub fn decode(&self, value: TensorValue) -> f32 {
        self.output.decode(value)
    }

    /// Encodes `x` directly into the first element of the input buffer.
    pub fn encode_into(&self, x: f32, buf: &mut [u8]) {
        match self.encode(x) {
            TensorValue::F32(v) => buf[..4].copy_from_slice(&v.to_le_bytes()),
            TensorValue::I8(v) => buf[0] = v as u8,
        }
    }

    /// Decodes the first element of the output buffer.
    pub fn decode_from(&self, buf: &[u8]) -> f32 {
        match self.output {
            Codec::Float => {
                let mut bytes = [0u8; 4];
                bytes.copy_from_slice(&buf[..4]);
                f32::from_le_bytes(bytes)
            }
            Codec::Affine { .. } => self.decode(TensorValue::I8(buf[0] as i8)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_blob::TensorDescriptor;

    fn quantized(scale_in: f32, zp_in: i32, scale_out: f32, zp_out: i32) -> Quantizer {
        Quantizer::from_descriptors(
            &TensorDescriptor::scalar_i8(scale_in, zp_in),
            &TensorDescriptor::scalar_i8(scale_out, zp_out),
        )
        .unwrap()
    }

    fn float() -> Quantizer {
        Quantizer::from_descriptors(
            &TensorDescriptor::scalar_f32(),
            &TensorDescriptor::scalar_f32(),
        )
        .unwrap()
    }

    #[test]
    fn test_float_passthrough() {
        let q = float();
        assert_eq!(q.encode(1.25), TensorValue::F32(1.25));
        assert_eq!(q.decode(TensorValue::F32(-0.5)), -0.5);
    }

    #[test]
    fn test_affine_encode() {
        let q = quantized(0.5, 10, 0.5, 10);
        // 2.0 / 0.5 + 10 = 14
        assert_eq!(q.encode(2.0), TensorValue::I8(14));
    }

    #[test]
    fn test_affine_decode() {
        let q = quantized(0.5, 10, 0.5, 10);
        // (14 - 10) * 0.5 = 2.0
        assert_eq!(q.decode(TensorValue::I8(14)), 2.0);
    }

    #[test]
    fn test_encode_clamps_to_i8_range() {
        let q = quantized(0.0078, -128, 0.0078, -128);
        // 1.0 / 0.0078 - 128 ≈ 0.2 — in range, no clamping.
        assert_eq!(q.encode(1.0), TensorValue::I8(0));
        // 3.0 / 0.0078 - 128 ≈ 256.6 — clamps to the top of the range.
        assert_eq!(q.encode(3.0), TensorValue::I8(127));
        // -1.0 / 0.0078 - 128 ≈ -256.2 — clamps to the bottom.
        assert_eq!(q.encode(-1.0), TensorValue::I8(-128));
    }

    #[test]
    fn test_roundtrip_within_one_step() {
        let cases = [(0.0246, -128), (0.0078, 0), (0.5, 10), (1.0, -1)];
        for (scale, zp) in cases {
            let q = quantized(scale, zp, scale, zp);
            for i in 0..100 {
                let x = (i as f32 / 100.0) * scale * 100.0;
                let back = q.decode(q.encode(x));
                assert!(
                    (back - x).abs() <= scale,
                    "roundtrip of {x} via scale {scale} zp {zp} drifted to {back}",
                );
            }
        }
    }

    #[test]
    fn test_buffer_codec_quantized() {
        let q = quantized(0.5, 0, 0.5, 0);
        let mut buf = [0u8; 1];
        q.encode_into(3.0, &mut buf);
        assert_eq!(buf[0] as i8, 6);
        assert_eq!(q.decode_from(&buf), 3.0);
    }

    #[test]
    fn test_buffer_codec_float() {
        let q = float();
        let mut buf = [0u8; 4];
        q.encode_into(-2.5, &mut buf);
        assert_eq!(q.decode_from(&buf), -2.5);
    }

    #[test]
    fn test_inconsistent_descriptor_rejected() {
        let mut d = TensorDescriptor::scalar_i8(0.5, 0);
        d.quant = None;
        let result = Quantizer::from_descriptors(&d, &TensorDescriptor::scalar_f32());
        assert!(matches!(result, Err(SetupError::Config(_))));
    }
}
