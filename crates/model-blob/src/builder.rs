// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Assembling model blobs.
//!
//! [`BlobBuilder`] produces byte vectors in the format [`crate::ModelHandle`]
//! parses. It backs the compiled-in demo resource and lets tests fabricate
//! malformed or version-skewed blobs without hand-writing byte offsets.

use crate::{handle, BlobError, ElementKind, TensorDescriptor};

/// Builder for model blobs.
///
/// # Example
/// ```
/// use model_blob::{BlobBuilder, ModelHandle, TensorDescriptor};
///
/// let blob = BlobBuilder::new(
///     TensorDescriptor::scalar_i8(0.0246, -128),
///     TensorDescriptor::scalar_i8(0.0079, 0),
/// )
/// .scratch_hint(16)
/// .payload(vec![0u8; 256])
/// .build()
/// .unwrap();
///
/// let handle = ModelHandle::from_bytes(&blob).unwrap();
/// assert_eq!(handle.payload().len(), 256);
/// ```
#[derive(Debug, Clone)]
pub struct BlobBuilder {
    schema_version: u16,
    input: TensorDescriptor,
    output: TensorDescriptor,
    scratch_hint: u32,
    payload: Vec<u8>,
}

impl BlobBuilder {
    /// Starts a builder for the current schema version with the given
    /// input/output descriptors, no scratch hint, and an empty payload.
    pub fn new(input: TensorDescriptor, output: TensorDescriptor) -> Self {
        Self {
            schema_version: handle::SCHEMA_VERSION,
            input,
            output,
            scratch_hint: 0,
            payload: Vec::new(),
        }
    }

    /// Overrides the declared schema version.
    pub fn schema_version(mut self, version: u16) -> Self {
        self.schema_version = version;
        self
    }

    /// Sets the declared engine scratch requirement in bytes.
    pub fn scratch_hint(mut self, bytes: u32) -> Self {
        self.scratch_hint = bytes;
        self
    }

    /// Sets the opaque weight payload.
    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    /// Validates the descriptors and serializes the blob.
    pub fn build(self) -> Result<Vec<u8>, BlobError> {
        self.input.validate("input")?;
        self.output.validate("output")?;

        let mut out = Vec::with_capacity(32 + self.payload.len());
        out.extend_from_slice(&handle::MAGIC);
        out.extend_from_slice(&self.schema_version.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // reserved flags

        write_descriptor(&mut out, &self.input);
        write_descriptor(&mut out, &self.output);

        out.extend_from_slice(&self.scratch_hint.to_le_bytes());
        out.extend_from_slice(&self.payload);
        Ok(out)
    }
}

fn write_descriptor(out: &mut Vec<u8>, descriptor: &TensorDescriptor) {
    out.push(match descriptor.kind {
        ElementKind::F32 => 0,
        ElementKind::I8 => 1,
    });
    out.push(descriptor.dims.len() as u8);
    for &dim in &descriptor.dims {
        out.extend_from_slice(&dim.to_le_bytes());
    }
    match &descriptor.quant {
        None => out.push(0),
        Some(q) => {
            out.push(1);
            out.extend_from_slice(&q.scale.to_le_bytes());
            out.extend_from_slice(&q.zero_point.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelHandle;

    #[test]
    fn test_build_and_parse() {
        let blob = BlobBuilder::new(
            TensorDescriptor::scalar_i8(0.5, -10),
            TensorDescriptor::scalar_f32(),
        )
        .scratch_hint(128)
        .payload(vec![9u8; 7])
        .build()
        .unwrap();

        let handle = ModelHandle::from_bytes(&blob).unwrap();
        assert_eq!(handle.input().quant.unwrap().zero_point, -10);
        assert_eq!(handle.output().kind, ElementKind::F32);
        assert_eq!(handle.scratch_hint(), 128);
        assert_eq!(handle.payload(), &[9u8; 7]);
    }

    #[test]
    fn test_build_rejects_invalid_descriptor() {
        let result = BlobBuilder::new(
            TensorDescriptor::scalar_i8(0.0, 0), // zero scale
            TensorDescriptor::scalar_f32(),
        )
        .build();
        assert!(matches!(result, Err(BlobError::InvalidDescriptor { .. })));
    }

    #[test]
    fn test_empty_payload_is_valid() {
        let blob = BlobBuilder::new(
            TensorDescriptor::scalar_f32(),
            TensorDescriptor::scalar_f32(),
        )
        .build()
        .unwrap();
        let handle = ModelHandle::from_bytes(&blob).unwrap();
        assert!(handle.payload().is_empty());
    }
}
