// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Zero-copy parsing of the compiled-in model resource.
//!
//! A model blob is a little-endian binary with the layout:
//!
//! ```text
//! offset 0   magic            b"SINM"
//!        4   schema version   u16
//!        6   header flags     u16 (reserved, must be zero)
//!        8   input descriptor
//!        ..  output descriptor
//!        ..  scratch hint     u32
//!        ..  payload          opaque bytes, engine-owned
//! ```
//!
//! Each descriptor is serialized as: element kind (`u8`), rank (`u8`),
//! `rank` dimension extents (`u32` each), a quantization presence byte, and
//! — when present — scale (`f32`) and zero point (`i32`).
//!
//! [`ModelHandle::from_bytes`] borrows the blob; nothing is copied. The
//! payload is never interpreted here — it belongs to the inference engine.

use crate::{BlobError, ElementKind, QuantParams, TensorDescriptor};

/// Magic bytes opening every model blob.
pub const MAGIC: [u8; 4] = *b"SINM";

/// The blob format revision this crate reads and writes.
///
/// Engines declare the version they support; the interpreter binding
/// compares it against the version a blob declares at bind time.
pub const SCHEMA_VERSION: u16 = 3;

/// An immutable, zero-copy view over a model blob.
///
/// Created once at startup from the compiled-in resource; never mutated.
/// The handle exposes only the schema version, the two tensor descriptors,
/// the scratch hint, and the opaque payload.
#[derive(Debug, Clone)]
pub struct ModelHandle<'a> {
    schema_version: u16,
    input: TensorDescriptor,
    output: TensorDescriptor,
    scratch_hint: usize,
    payload: &'a [u8],
}

impl<'a> ModelHandle<'a> {
    /// Parses a model blob, validating the header and both descriptors.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, BlobError> {
        let mut cursor = Cursor::new(bytes);

        let found = cursor.take_array::<4>()?;
        if found != MAGIC {
            return Err(BlobError::BadMagic {
                expected: MAGIC,
                found,
            });
        }

        let schema_version = cursor.take_u16()?;
        let flags = cursor.take_u16()?;
        if flags != 0 {
            return Err(BlobError::UnsupportedFlags(flags));
        }

        let input = cursor.take_descriptor("input")?;
        let output = cursor.take_descriptor("output")?;
        let scratch_hint = cursor.take_u32()? as usize;
        let payload = cursor.rest();

        tracing::debug!(
            schema_version,
            payload_bytes = payload.len(),
            "model blob parsed",
        );

        Ok(Self {
            schema_version,
            input,
            output,
            scratch_hint,
            payload,
        })
    }

    /// Returns the schema version the blob declares.
    pub fn schema_version(&self) -> u16 {
        self.schema_version
    }

    /// Returns the input tensor descriptor.
    pub fn input(&self) -> &TensorDescriptor {
        &self.input
    }

    /// Returns the output tensor descriptor.
    pub fn output(&self) -> &TensorDescriptor {
        &self.output
    }

    /// Returns the blob's declared engine scratch requirement, in bytes.
    pub fn scratch_hint(&self) -> usize {
        self.scratch_hint
    }

    /// Returns the opaque weight payload.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Returns a human-readable one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "model blob: schema v{}, input {}, output {}, scratch hint {} B, payload {} B",
            self.schema_version,
            self.input.summary(),
            self.output.summary(),
            self.scratch_hint,
            self.payload.len(),
        )
    }
}

/// Little-endian field reader over a byte slice.
struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], BlobError> {
        if self.bytes.len() - self.offset < len {
            return Err(BlobError::Truncated {
                offset: self.offset,
                need: len - (self.bytes.len() - self.offset),
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], BlobError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn take_u8(&mut self) -> Result<u8, BlobError> {
        Ok(self.take_array::<1>()?[0])
    }

    fn take_u16(&mut self) -> Result<u16, BlobError> {
        Ok(u16::from_le_bytes(self.take_array::<2>()?))
    }

    fn take_u32(&mut self) -> Result<u32, BlobError> {
        Ok(u32::from_le_bytes(self.take_array::<4>()?))
    }

    fn take_f32(&mut self) -> Result<f32, BlobError> {
        Ok(f32::from_le_bytes(self.take_array::<4>()?))
    }

    fn take_i32(&mut self) -> Result<i32, BlobError> {
        Ok(i32::from_le_bytes(self.take_array::<4>()?))
    }

    fn take_descriptor(&mut self, tensor: &'static str) -> Result<TensorDescriptor, BlobError> {
        let kind = match self.take_u8()? {
            0 => ElementKind::F32,
            1 => ElementKind::I8,
            other => {
                return Err(BlobError::InvalidDescriptor {
                    tensor,
                    detail: format!("unknown element kind tag {other}"),
                })
            }
        };

        let rank = self.take_u8()? as usize;
        let mut dims = Vec::with_capacity(rank);
        for _ in 0..rank {
            dims.push(self.take_u32()?);
        }

        let quant = match self.take_u8()? {
            0 => None,
            1 => Some(QuantParams {
                scale: self.take_f32()?,
                zero_point: self.take_i32()?,
            }),
            other => {
                return Err(BlobError::InvalidDescriptor {
                    tensor,
                    detail: format!("unknown quantization tag {other}"),
                })
            }
        };

        let descriptor = TensorDescriptor { kind, dims, quant };
        descriptor.validate(tensor)?;
        Ok(descriptor)
    }

    fn rest(self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }
}
