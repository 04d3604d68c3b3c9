// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by tap-reporter.

use camino::Utf8PathBuf;
use std::io;
use thiserror::Error;

/// An error that occurred while parsing a log level name.
///
/// Returned at configuration time; the reporter does not attempt to guess a
/// fallback level.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown log level `{input}` (expected one of ERROR, WARN, INFO)")]
pub struct InvalidLogLevelError {
    input: String,
}

impl InvalidLogLevelError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the input that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// The TAP plan line was written a second time.
///
/// The plan (`1..N`) may be emitted at most once per writer lifetime; a second
/// attempt indicates a bug in the caller and is not recoverable.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("TAP test plan can be written only once")]
pub struct PlanAlreadyWrittenError;

/// A temporary output region was requested outside a buffering scope.
///
/// `temporary()` is only valid between `buffer()` and the next `flush()`.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("temporary output requires an active buffer (call buffer() first)")]
pub struct NotBufferingError;

/// An error that occurred while opening the configured output file.
#[derive(Debug, Error)]
#[error("failed to open report output at `{path}`")]
pub struct OutputOpenError {
    path: Utf8PathBuf,
    #[source]
    err: io::Error,
}

impl OutputOpenError {
    pub(crate) fn new(path: impl Into<Utf8PathBuf>, err: io::Error) -> Self {
        Self {
            path: path.into(),
            err,
        }
    }

    /// Returns the path that failed to open.
    pub fn path(&self) -> &Utf8PathBuf {
        &self.path
    }
}

/// An error that occurred while writing out a test-run event.
#[derive(Debug, Error)]
pub enum WriteEventError {
    /// An error occurred while writing to the output stream.
    #[error("error writing to output")]
    Io(#[from] io::Error),

    /// The TAP plan was written more than once.
    #[error("error writing TAP plan")]
    Plan(#[from] PlanAlreadyWrittenError),

    /// A temporary region was requested without buffering first.
    #[error("error writing temporary output")]
    Temporal(#[from] NotBufferingError),
}

/// The signal returned by [`TapReporter::get_last_error`] when a run had
/// failures.
///
/// The host is expected to translate this into a non-zero process exit code;
/// the reporter itself never exits the process.
///
/// [`TapReporter::get_last_error`]: crate::reporter::TapReporter::get_last_error
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("failing tests found")]
pub struct RunFailedError;
