// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporter configuration.

use crate::logger::LogLevel;
use camino::Utf8PathBuf;
use serde::Deserialize;

/// Options recognized by the reporter.
///
/// Typically deserialized from the host test-runner's reporter options
/// block; every field has a default.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReporterConfig {
    /// Verbosity threshold. Defaults to `INFO`.
    pub log_level: LogLevel,

    /// Write the report to this file instead of the console.
    ///
    /// File output is plain TAP-compliant text: color styling is disabled
    /// and the transient progress region is never used.
    pub file_path: Option<Utf8PathBuf>,

    /// Show transient progress after each suite.
    ///
    /// Defaults to on for interactive terminals, and off when writing to a
    /// file or running under continuous integration.
    pub show_progress: Option<bool>,

    /// Emit the run header on run start. Defaults to true.
    pub show_header: bool,

    /// Include vendor/runtime-internal stack frames in failure output.
    /// Defaults to false.
    pub show_internal_stack_traces: bool,

    /// The directory paths are reported relative to. Defaults to the
    /// current working directory.
    pub root: Option<Utf8PathBuf>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            file_path: None,
            show_progress: None,
            show_header: true,
            show_internal_stack_traces: false,
            root: None,
        }
    }
}
