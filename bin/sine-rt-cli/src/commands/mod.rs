// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations.

pub mod inspect;
pub mod run;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber from the `-v` count.
///
/// `RUST_LOG` wins when set; otherwise `-v` selects debug and `-vv` trace.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Reads a blob from disk, or assembles the embedded demo model.
pub fn load_blob(model: Option<std::path::PathBuf>) -> anyhow::Result<Vec<u8>> {
    use anyhow::Context;

    match model {
        Some(path) => std::fs::read(&path)
            .with_context(|| format!("cannot read model blob '{}'", path.display())),
        None => {
            tracing::debug!("no model path given, using the embedded demo model");
            Ok(cycle_runtime::demo::sine_model_blob())
        }
    }
}
