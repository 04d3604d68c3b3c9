// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Physical output streams and the buffering sink on top of them.
//!
//! The reporter writes UTF-8 text only, so streams accept `&str` rather than
//! bytes. Cursor control is modeled as a capability: streams that cannot move
//! the cursor (files, buffers, piped output) take the no-op path and the
//! transient progress region is simply never erased there.

mod temporal;

pub use temporal::TemporalOutput;

use crossterm::{
    Command,
    cursor::{MoveToColumn, MoveUp},
    terminal::{Clear, ClearType},
};
use std::{
    fs::File,
    io::{self, BufWriter, IsTerminal, Stdout, Write},
};

/// A capability-aware text output stream.
///
/// The default implementations describe a stream without cursor control: all
/// cursor operations succeed without doing anything.
pub trait OutputStream {
    /// Writes text to the stream.
    fn write_text(&mut self, text: &str) -> io::Result<()>;

    /// Flushes any intermediately buffered contents to their destination.
    fn flush(&mut self) -> io::Result<()>;

    /// Returns true if the stream honors cursor-movement operations.
    fn supports_cursor_control(&self) -> bool {
        false
    }

    /// Moves the cursor to column zero of the current line.
    fn move_cursor_to_column_zero(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Clears the current line.
    fn clear_line(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Moves the cursor up one line.
    fn move_cursor_up(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Returns the stream's visual width in columns, if known.
    fn columns(&self) -> Option<usize> {
        None
    }
}

fn ansi_sequence(command: impl Command) -> io::Result<String> {
    let mut seq = String::new();
    command
        .write_ansi(&mut seq)
        .map_err(|_| io::Error::other("formatter error"))?;
    Ok(seq)
}

/// The interactive console stream.
///
/// Cursor control is only reported when standard output is a terminal;
/// redirected output degrades to plain sequential writes.
#[derive(Debug)]
pub struct TerminalStream {
    stdout: Stdout,
    is_terminal: bool,
}

impl TerminalStream {
    /// Creates a stream over standard output.
    pub fn new() -> Self {
        let stdout = io::stdout();
        let is_terminal = stdout.is_terminal();
        Self {
            stdout,
            is_terminal,
        }
    }

    /// Returns true if standard output is a terminal.
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }
}

impl Default for TerminalStream {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputStream for TerminalStream {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.stdout.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    fn supports_cursor_control(&self) -> bool {
        self.is_terminal
    }

    fn move_cursor_to_column_zero(&mut self) -> io::Result<()> {
        let seq = ansi_sequence(MoveToColumn(0))?;
        self.write_text(&seq)
    }

    fn clear_line(&mut self) -> io::Result<()> {
        let seq = ansi_sequence(Clear(ClearType::CurrentLine))?;
        self.write_text(&seq)
    }

    fn move_cursor_up(&mut self) -> io::Result<()> {
        let seq = ansi_sequence(MoveUp(1))?;
        self.write_text(&seq)
    }

    fn columns(&self) -> Option<usize> {
        if !self.is_terminal {
            return None;
        }
        crossterm::terminal::size()
            .ok()
            .map(|(width, _)| width as usize)
    }
}

/// A file-backed stream. Never cursor-capable.
#[derive(Debug)]
pub struct FileStream {
    file: BufWriter<File>,
}

impl FileStream {
    pub(crate) fn new(file: fs_err::File) -> Self {
        Self {
            file: BufWriter::new(file.into_parts().0),
        }
    }
}

impl OutputStream for FileStream {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.file.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// The stream selected for a reporter: terminal, file, or an in-memory
/// buffer for tests and embedding.
#[derive(Debug)]
pub(crate) enum StreamImpl<'a> {
    Terminal(TerminalStream),
    File(FileStream),
    Buffer(&'a mut String),
}

impl OutputStream for StreamImpl<'_> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        match self {
            Self::Terminal(stream) => stream.write_text(text),
            Self::File(stream) => stream.write_text(text),
            Self::Buffer(buf) => {
                buf.push_str(text);
                Ok(())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Terminal(stream) => stream.flush(),
            Self::File(stream) => stream.flush(),
            Self::Buffer(_) => Ok(()),
        }
    }

    fn supports_cursor_control(&self) -> bool {
        match self {
            Self::Terminal(stream) => stream.supports_cursor_control(),
            Self::File(_) | Self::Buffer(_) => false,
        }
    }

    fn move_cursor_to_column_zero(&mut self) -> io::Result<()> {
        match self {
            Self::Terminal(stream) => stream.move_cursor_to_column_zero(),
            Self::File(_) | Self::Buffer(_) => Ok(()),
        }
    }

    fn clear_line(&mut self) -> io::Result<()> {
        match self {
            Self::Terminal(stream) => stream.clear_line(),
            Self::File(_) | Self::Buffer(_) => Ok(()),
        }
    }

    fn move_cursor_up(&mut self) -> io::Result<()> {
        match self {
            Self::Terminal(stream) => stream.move_cursor_up(),
            Self::File(_) | Self::Buffer(_) => Ok(()),
        }
    }

    fn columns(&self) -> Option<usize> {
        match self {
            Self::Terminal(stream) => stream.columns(),
            Self::File(_) | Self::Buffer(_) => None,
        }
    }
}

impl OutputStream for String {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
