// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test support: an output stream that records every operation.

use crate::output::OutputStream;
use std::io;

/// A single operation observed by a [`RecordingStream`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum StreamOp {
    Write(String),
    CursorToColumnZero,
    ClearLine,
    CursorUp,
}

/// An in-memory stream that records writes and cursor operations.
#[derive(Debug, Default)]
pub(crate) struct RecordingStream {
    ops: Vec<StreamOp>,
    cursor_control: bool,
    columns: Option<usize>,
}

impl RecordingStream {
    /// A stream that reports cursor-control capability, like a terminal.
    pub(crate) fn interactive() -> Self {
        Self {
            ops: Vec::new(),
            cursor_control: true,
            columns: Some(80),
        }
    }

    pub(crate) fn ops(&self) -> &[StreamOp] {
        &self.ops
    }

    pub(crate) fn last_ops(&self, count: usize) -> &[StreamOp] {
        &self.ops[self.ops.len().saturating_sub(count)..]
    }

    /// Everything written, with cursor operations ignored.
    pub(crate) fn written(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                StreamOp::Write(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The number of erase cycles (cursor-up movements) observed so far.
    pub(crate) fn erase_cycles(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| **op == StreamOp::CursorUp)
            .count()
    }
}

impl OutputStream for RecordingStream {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.ops.push(StreamOp::Write(text.to_owned()));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn supports_cursor_control(&self) -> bool {
        self.cursor_control
    }

    fn move_cursor_to_column_zero(&mut self) -> io::Result<()> {
        self.ops.push(StreamOp::CursorToColumnZero);
        Ok(())
    }

    fn clear_line(&mut self) -> io::Result<()> {
        self.ops.push(StreamOp::ClearLine);
        Ok(())
    }

    fn move_cursor_up(&mut self) -> io::Result<()> {
        self.ops.push(StreamOp::CursorUp);
        Ok(())
    }

    fn columns(&self) -> Option<usize> {
        self.columns
    }
}
