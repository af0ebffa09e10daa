// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for model blob parsing and validation.

/// Errors that can occur while parsing or assembling a model blob.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// The blob ended before a required field.
    #[error("truncated blob: need {need} more bytes at offset {offset}")]
    Truncated { offset: usize, need: usize },

    /// The blob does not start with the expected magic bytes.
    #[error("bad magic: expected {expected:?}, found {found:?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },

    /// The header carries flag bits this revision does not define.
    #[error("unsupported header flags: {0:#06x}")]
    UnsupportedFlags(u16),

    /// A tensor descriptor is malformed.
    #[error("invalid {tensor} tensor descriptor: {detail}")]
    InvalidDescriptor {
        tensor: &'static str,
        detail: String,
    },
}
