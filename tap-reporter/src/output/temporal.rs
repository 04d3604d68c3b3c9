// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::NotBufferingError, output::OutputStream};
use std::{io, mem};
use tracing::debug;

/// A sink that batches output and supports a trailing "temporary" region.
///
/// Buffered writes accumulate until [`flush`](Self::flush) emits them as one
/// unit. Writes made after [`temporary`](Self::temporary) form a transient
/// region: the next write that reaches the physical stream erases it first
/// (when the stream has cursor control), so live progress can be overwritten
/// by the next batch of real content.
#[derive(Debug)]
pub struct TemporalOutput<S> {
    stream: S,
    queue: String,
    queue_temporary: String,
    is_buffering: bool,
    is_temporary: bool,
    lines_to_erase: usize,
}

impl<S: OutputStream> TemporalOutput<S> {
    /// Creates a new sink over the given stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            queue: String::new(),
            queue_temporary: String::new(),
            is_buffering: false,
            is_temporary: false,
            lines_to_erase: 0,
        }
    }

    /// Enters buffering mode: subsequent writes accumulate until the next
    /// [`flush`](Self::flush).
    pub fn buffer(&mut self) {
        self.is_buffering = true;
    }

    /// Marks all subsequent writes, until the next flush, as temporary.
    ///
    /// Fails if the sink is not currently buffering.
    pub fn temporary(&mut self) -> Result<(), NotBufferingError> {
        if !self.is_buffering {
            return Err(NotBufferingError);
        }
        self.is_temporary = true;
        Ok(())
    }

    /// Writes text: into the appropriate accumulator while buffering,
    /// straight to the stream otherwise.
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        if self.is_buffering {
            if self.is_temporary {
                self.queue_temporary.push_str(text);
            } else {
                self.queue.push_str(text);
            }
            Ok(())
        } else {
            self.write_now(text)
        }
    }

    /// Emits the accumulated batch, then the temporary region, and records
    /// how many visual lines the temporary region spans so the next physical
    /// write can erase it.
    pub fn flush(&mut self) -> io::Result<()> {
        self.is_buffering = false;

        let queue = mem::take(&mut self.queue);
        self.write_now(&queue)?;

        let queue_temporary = mem::take(&mut self.queue_temporary);
        self.write_now(&queue_temporary)?;

        // A trailing newline does not start a new visual line, so the erase
        // count is the newline count, not the line count.
        self.lines_to_erase = queue_temporary.matches('\n').count();
        self.is_temporary = false;
        debug!(
            lines_to_erase = self.lines_to_erase,
            "flushed buffered output"
        );

        self.stream.flush()
    }

    /// Returns a reference to the underlying stream.
    pub fn stream(&self) -> &S {
        &self.stream
    }

    fn write_now(&mut self, text: &str) -> io::Result<()> {
        if self.lines_to_erase > 0 && self.stream.supports_cursor_control() {
            for _ in 0..self.lines_to_erase {
                self.stream.move_cursor_to_column_zero()?;
                self.stream.clear_line()?;
                self.stream.move_cursor_up()?;
            }
            self.lines_to_erase = 0;
        }
        self.stream.write_text(text)
    }
}
