// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-blob
//!
//! A zero-copy handle over the compiled-in model resource.
//!
//! The model is an opaque, versioned, immutable binary blob. This crate
//! consumes it only as far as the runtime needs:
//!
//! - [`ModelHandle`] — borrows the blob, exposes the schema version, the
//!   input/output [`TensorDescriptor`]s, a scratch-size hint, and the raw
//!   weight payload. The payload is never interpreted here; it belongs to
//!   the inference engine.
//! - [`TensorDescriptor`] — shape, [`ElementKind`] (`f32` or quantized
//!   `i8`), and the [`QuantParams`] scale/zero-point pair satisfying
//!   `real = (stored - zero_point) * scale`.
//! - [`BlobBuilder`] — assembles blobs in the same format, backing the
//!   embedded demo resource and test fixtures.
//!
//! Whether a blob's declared [`SCHEMA_VERSION`] is acceptable is decided by
//! the inference engine at bind time, not here — the handle parses any
//! structurally valid revision and reports what it found.

mod builder;
mod descriptor;
mod error;
mod handle;

pub use builder::BlobBuilder;
pub use descriptor::{ElementKind, QuantParams, TensorDescriptor, MAX_RANK};
pub use error::BlobError;
pub use handle::{ModelHandle, MAGIC, SCHEMA_VERSION};
