// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Severity-thresholded line emission.
//!
//! The [`Logger`] gates whether a line is emitted at all; everything it does
//! emit is delegated to a [`TemporalOutput`], which owns buffering and the
//! transient progress region.

use crate::{
    errors::{InvalidLogLevelError, NotBufferingError},
    output::{OutputStream, TemporalOutput},
};
use serde::Deserialize;
use std::{fmt, io, str::FromStr};

/// Verbosity threshold for reporter output.
///
/// Levels are ordered by increasing permissiveness: a logger set to
/// [`LogLevel::Info`] emits info, warn and error lines, while one set to
/// [`LogLevel::Error`] emits only error lines.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Ord, PartialEq, PartialOrd)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Only error lines are emitted.
    Error,
    /// Warning and error lines are emitted.
    Warn,
    /// All lines are emitted.
    #[default]
    Info,
}

impl LogLevel {
    /// The canonical upper-case name of this level.
    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
        }
    }
}

impl FromStr for LogLevel {
    type Err = InvalidLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ERROR" => Ok(LogLevel::Error),
            "WARN" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            other => Err(InvalidLogLevelError::new(other)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A leveled line logger over a [`TemporalOutput`].
///
/// Holds no buffering state of its own: `buffer`, `temporary` and `flush`
/// pass straight through to the sink.
#[derive(Debug)]
pub struct Logger<S> {
    level: LogLevel,
    output: TemporalOutput<S>,
}

impl<S: OutputStream> Logger<S> {
    /// Creates a new logger over the given stream.
    pub fn new(stream: S, level: LogLevel) -> Self {
        Self {
            level,
            output: TemporalOutput::new(stream),
        }
    }

    /// Sets the verbosity threshold.
    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    /// Returns the current verbosity threshold.
    pub fn get_level(&self) -> LogLevel {
        self.level
    }

    /// Writes a line unconditionally, regardless of the configured level.
    ///
    /// Used for TAP result and plan lines, which must always appear.
    pub fn log(&mut self, line: &str) -> io::Result<()> {
        self.output.write(line)?;
        self.output.write("\n")
    }

    /// Writes a line at info severity.
    pub fn info(&mut self, line: &str) -> io::Result<()> {
        if self.level >= LogLevel::Info {
            self.log(line)?;
        }
        Ok(())
    }

    /// Writes a line at warn severity.
    pub fn warn(&mut self, line: &str) -> io::Result<()> {
        if self.level >= LogLevel::Warn {
            self.log(line)?;
        }
        Ok(())
    }

    /// Writes a line at error severity.
    pub fn error(&mut self, line: &str) -> io::Result<()> {
        if self.level >= LogLevel::Error {
            self.log(line)?;
        }
        Ok(())
    }

    /// Writes raw text without a trailing newline and without level gating.
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.write(text)
    }

    /// Enters buffering mode on the underlying sink.
    pub fn buffer(&mut self) {
        self.output.buffer();
    }

    /// Marks subsequent writes as temporary on the underlying sink.
    pub fn temporary(&mut self) -> Result<(), NotBufferingError> {
        self.output.temporary()
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }

    /// Returns the terminal width of the underlying stream, if known.
    pub(crate) fn stream_columns(&self) -> Option<usize> {
        self.output.stream().columns()
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &TemporalOutput<S> {
        &self.output
    }
}
