// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor descriptors: shape, element kind, and quantization parameters.

use crate::BlobError;

/// Maximum tensor rank a blob may declare.
pub const MAX_RANK: usize = 4;

/// Enumerates the element types a model tensor can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ElementKind {
    /// 32-bit IEEE 754 floating point.
    F32,
    /// 8-bit signed integer (quantized storage).
    I8,
}

impl ElementKind {
    /// Returns the size of a single element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            ElementKind::F32 => 4,
            ElementKind::I8 => 1,
        }
    }

    /// Returns a human-readable label for this element kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::F32 => "f32",
            ElementKind::I8 => "i8",
        }
    }
}

/// Per-tensor affine quantization parameters.
///
/// A stored value `v` maps to the real line as
/// `real = (v - zero_point) * scale`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuantParams {
    /// Positive step between adjacent representable values.
    pub scale: f32,
    /// Stored value that maps to real 0.
    pub zero_point: i32,
}

/// Shape, element kind, and quantization of one model tensor.
///
/// Quantization parameters are present exactly when the element kind is
/// [`ElementKind::I8`]; float tensors are a raw passthrough.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TensorDescriptor {
    /// Element kind of the stored data.
    pub kind: ElementKind,
    /// Dimension extents, outermost first.
    pub dims: Vec<u32>,
    /// Affine quantization, for `I8` tensors.
    pub quant: Option<QuantParams>,
}

impl TensorDescriptor {
    /// A `[1, 1]` float scalar.
    pub fn scalar_f32() -> Self {
        Self {
            kind: ElementKind::F32,
            dims: vec![1, 1],
            quant: None,
        }
    }

    /// A `[1, 1]` quantized scalar with the given parameters.
    pub fn scalar_i8(scale: f32, zero_point: i32) -> Self {
        Self {
            kind: ElementKind::I8,
            dims: vec![1, 1],
            quant: Some(QuantParams { scale, zero_point }),
        }
    }

    /// Returns the number of elements the tensor holds.
    pub fn element_count(&self) -> usize {
        self.dims.iter().map(|&d| d as usize).product()
    }

    /// Returns the tensor's storage size in bytes.
    pub fn byte_len(&self) -> usize {
        self.element_count() * self.kind.size_bytes()
    }

    /// Validates the descriptor.
    ///
    /// Checks:
    /// - Rank is in `1..=MAX_RANK` and no dimension is zero.
    /// - `I8` tensors carry quantization parameters; `F32` tensors do not.
    /// - A present scale is finite and positive.
    pub fn validate(&self, tensor: &'static str) -> Result<(), BlobError> {
        if self.dims.is_empty() || self.dims.len() > MAX_RANK {
            return Err(BlobError::InvalidDescriptor {
                tensor,
                detail: format!("rank {} outside 1..={MAX_RANK}", self.dims.len()),
            });
        }

        if self.dims.iter().any(|&d| d == 0) {
            return Err(BlobError::InvalidDescriptor {
                tensor,
                detail: format!("zero-sized dimension in {:?}", self.dims),
            });
        }

        match (self.kind, &self.quant) {
            (ElementKind::I8, None) => Err(BlobError::InvalidDescriptor {
                tensor,
                detail: "i8 tensor without quantization parameters".into(),
            }),
            (ElementKind::F32, Some(_)) => Err(BlobError::InvalidDescriptor {
                tensor,
                detail: "f32 tensor with quantization parameters".into(),
            }),
            (_, Some(q)) if !(q.scale.is_finite() && q.scale > 0.0) => {
                Err(BlobError::InvalidDescriptor {
                    tensor,
                    detail: format!("scale {} is not a positive finite value", q.scale),
                })
            }
            _ => Ok(()),
        }
    }

    /// Returns a human-readable one-line summary.
    pub fn summary(&self) -> String {
        let dims: Vec<String> = self.dims.iter().map(|d| d.to_string()).collect();
        match &self.quant {
            Some(q) => format!(
                "{} [{}], scale {:.6}, zero point {}",
                self.kind.as_str(),
                dims.join("x"),
                q.scale,
                q.zero_point,
            ),
            None => format!("{} [{}]", self.kind.as_str(), dims.join("x")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kind_sizes() {
        assert_eq!(ElementKind::F32.size_bytes(), 4);
        assert_eq!(ElementKind::I8.size_bytes(), 1);
        assert_eq!(ElementKind::F32.as_str(), "f32");
        assert_eq!(ElementKind::I8.as_str(), "i8");
    }

    #[test]
    fn test_scalar_constructors() {
        let f = TensorDescriptor::scalar_f32();
        assert_eq!(f.element_count(), 1);
        assert_eq!(f.byte_len(), 4);
        f.validate("input").unwrap();

        let q = TensorDescriptor::scalar_i8(0.0078, -128);
        assert_eq!(q.byte_len(), 1);
        q.validate("input").unwrap();
    }

    #[test]
    fn test_element_count() {
        let d = TensorDescriptor {
            kind: ElementKind::I8,
            dims: vec![2, 3, 4],
            quant: Some(QuantParams {
                scale: 1.0,
                zero_point: 0,
            }),
        };
        assert_eq!(d.element_count(), 24);
        assert_eq!(d.byte_len(), 24);
    }

    #[test]
    fn test_validate_rank_bounds() {
        let mut d = TensorDescriptor::scalar_f32();
        d.dims = vec![];
        assert!(d.validate("input").is_err());

        d.dims = vec![1; MAX_RANK + 1];
        assert!(d.validate("input").is_err());
    }

    #[test]
    fn test_validate_zero_dim() {
        let mut d = TensorDescriptor::scalar_f32();
        d.dims = vec![1, 0];
        assert!(d.validate("output").is_err());
    }

    #[test]
    fn test_validate_quant_pairing() {
        let mut d = TensorDescriptor::scalar_i8(0.5, 0);
        d.quant = None;
        assert!(d.validate("input").is_err());

        let mut d = TensorDescriptor::scalar_f32();
        d.quant = Some(QuantParams {
            scale: 1.0,
            zero_point: 0,
        });
        assert!(d.validate("input").is_err());
    }

    #[test]
    fn test_validate_scale() {
        assert!(TensorDescriptor::scalar_i8(0.0, 0).validate("input").is_err());
        assert!(TensorDescriptor::scalar_i8(-1.0, 0).validate("input").is_err());
        assert!(TensorDescriptor::scalar_i8(f32::NAN, 0)
            .validate("input")
            .is_err());
    }

    #[test]
    fn test_summary() {
        let d = TensorDescriptor::scalar_i8(0.0078, -128);
        let s = d.summary();
        assert!(s.contains("i8 [1x1]"));
        assert!(s.contains("-128"));

        let f = TensorDescriptor::scalar_f32();
        assert_eq!(f.summary(), "f32 [1x1]");
    }

    #[test]
    fn test_serde_roundtrip() {
        let d = TensorDescriptor::scalar_i8(0.0078, -128);
        let json = serde_json::to_string(&d).unwrap();
        let back: TensorDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
    }
}
