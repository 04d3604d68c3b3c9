// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure-message formatting.
//!
//! Turns one raw failure string (error summary on the first line, captured
//! stack trace after it) into a block of TAP comment lines, with vendor and
//! runtime-internal frames de-emphasized and user frames enriched with a
//! source snippet.

use crate::reporter::{
    code_frame::format_code_frame,
    helpers::{Styles, format_comment, relative_to},
};
use camino::Utf8Path;
use owo_colors::OwoColorize;
use regex::Regex;
use std::sync::LazyLock;

static TRACE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(.+)\((.+):([0-9]+):([0-9]+)\)$").expect("pattern is valid")
});
static AT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*at").expect("pattern is valid"));
static AT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*at (/[^:]+):([0-9]+):([0-9]+)\s*$").expect("pattern is valid")
});
static INTERNALS: LazyLock<Regex> = LazyLock::new(|| {
    // Vendored dependencies, runtime internals, and version-manager installs.
    Regex::new(r"^(node_modules|internal|(\.\./)*\.nvm)/").expect("pattern is valid")
});
static ERROR_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Error:\s*").expect("pattern is valid"));
static RECEIVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Received:").expect("pattern is valid"));
static EXPECTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Expected value to[^:]+:").expect("pattern is valid"));
static DIFFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Difference:").expect("pattern is valid"));

/// A diff section introduced by a richer assertion library.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SectionKind {
    Received,
    Expected,
    Difference,
}

/// One classified line of a failure message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TraceLine<'a> {
    /// `<description>(<file>:<row>:<col>)`.
    Frame {
        description: &'a str,
        file: &'a str,
        row: &'a str,
        column: &'a str,
    },
    /// `at <absolute-path>:<row>:<col>`, with no description.
    AbsoluteFrame {
        file: &'a str,
        row: &'a str,
        column: &'a str,
    },
    /// Starts like a trace line but matches neither frame shape.
    TraceAdjacent(&'a str),
    /// A diff section marker.
    Section(SectionKind),
    /// Free text.
    Plain(&'a str),
}

/// Classifies one line of a failure message.
pub(crate) fn classify(line: &str) -> TraceLine<'_> {
    if AT.is_match(line) {
        if let Some(caps) = TRACE_LINE.captures(line) {
            let (_, [description, file, row, column]) = caps.extract();
            return TraceLine::Frame {
                description,
                file,
                row,
                column,
            };
        }
        if let Some(caps) = AT_PATH.captures(line) {
            let (_, [file, row, column]) = caps.extract();
            return TraceLine::AbsoluteFrame { file, row, column };
        }
        return TraceLine::TraceAdjacent(line);
    }
    if RECEIVED.is_match(line) {
        return TraceLine::Section(SectionKind::Received);
    }
    if EXPECTED.is_match(line) {
        return TraceLine::Section(SectionKind::Expected);
    }
    if DIFFERENCE.is_match(line) {
        return TraceLine::Section(SectionKind::Difference);
    }
    TraceLine::Plain(line)
}

/// Formats failure messages against a configured root directory.
#[derive(Debug)]
pub(crate) struct FailureFormatter<'a> {
    root: &'a Utf8Path,
    styles: &'a Styles,
    show_internal_frames: bool,
}

impl<'a> FailureFormatter<'a> {
    pub(crate) fn new(root: &'a Utf8Path, styles: &'a Styles, show_internal_frames: bool) -> Self {
        Self {
            root,
            styles,
            show_internal_frames,
        }
    }

    /// Formats one failure message into a newline-joined block of TAP
    /// comment lines.
    pub(crate) fn format_message(&self, message: &str) -> String {
        let mut lines = message.split('\n');
        let first_line = lines.next().unwrap_or_default();
        let headline = ERROR_PREFIX.replace(first_line, "");

        let mut out: Vec<String> = Vec::new();
        out.push(String::new());
        out.push(headline.into_owned());
        out.push(String::new());

        // Internal-ness is sticky: once a frame resolves into vendored or
        // runtime-internal code, every later frame in this message is
        // treated as internal too.
        let mut seen_internal = false;
        let mut stack_header_pending = true;
        let mut section: Option<SectionKind> = None;

        for line in lines {
            match classify(line) {
                TraceLine::Frame {
                    description,
                    file,
                    row,
                    column,
                } => {
                    self.push_stack_header(&mut out, &mut stack_header_pending);
                    let relative = relative_to(self.root, Utf8Path::new(file));
                    if INTERNALS.is_match(relative.as_str()) {
                        seen_internal = true;
                    }

                    let text = format!(
                        "{description}({}:{}:{})",
                        relative.style(self.styles.path),
                        row.style(self.styles.bold),
                        column.style(self.styles.bold),
                    );
                    if seen_internal {
                        if self.show_internal_frames {
                            out.push(self.trace_line_dim(&text));
                        }
                    } else {
                        out.push(self.trace_line(&text));
                        self.push_code_frame(&mut out, file, row, column);
                    }
                }
                TraceLine::AbsoluteFrame { file, row, column } => {
                    self.push_stack_header(&mut out, &mut stack_header_pending);
                    if !seen_internal || self.show_internal_frames {
                        let relative = relative_to(self.root, Utf8Path::new(file));
                        let text = format!(
                            "at {}:{}:{}",
                            relative.style(self.styles.path),
                            row.style(self.styles.bold),
                            column.style(self.styles.bold),
                        );
                        if seen_internal {
                            out.push(self.trace_line_dim(&text));
                        } else {
                            out.push(self.trace_line(&text));
                        }
                    }
                }
                TraceLine::TraceAdjacent(text) => {
                    self.push_stack_header(&mut out, &mut stack_header_pending);
                    if seen_internal {
                        out.push(self.trace_line_dim(text));
                    } else {
                        out.push(self.trace_line(text));
                    }
                }
                TraceLine::Section(kind) => {
                    section = Some(kind);
                    match kind {
                        SectionKind::Received => {
                            out.push(String::new());
                            out.push("Received:".to_owned());
                            out.push(String::new());
                        }
                        SectionKind::Expected => {
                            out.push("Expected:".to_owned());
                            out.push(String::new());
                        }
                        SectionKind::Difference => {
                            out.push("Difference:".to_owned());
                        }
                    }
                }
                TraceLine::Plain(text) => match section {
                    Some(SectionKind::Received) | Some(SectionKind::Expected) => {
                        out.push(format!("  {text}"));
                    }
                    Some(SectionKind::Difference) => {
                        out.push(format!("    {}", text.trim()));
                    }
                    None => out.push(text.to_owned()),
                },
            }
        }

        let comment_lines: Vec<String> = out
            .iter()
            .map(|line| format_comment(&format!("  {line}"), self.styles))
            .collect();
        comment_lines.join("\n")
    }

    fn push_stack_header(&self, out: &mut Vec<String>, pending: &mut bool) {
        if !*pending {
            return;
        }
        *pending = false;
        let last_line_blank = out.last().is_some_and(|line| line.is_empty());
        if !last_line_blank {
            out.push(String::new());
        }
        out.push("Stack:".to_owned());
        out.push(String::new());
    }

    fn push_code_frame(&self, out: &mut Vec<String>, file: &str, row: &str, column: &str) {
        let (Ok(row), Ok(column)) = (row.parse::<usize>(), column.parse::<usize>()) else {
            return;
        };
        if let Some(frame) = format_code_frame(Utf8Path::new(file), row, column, self.styles) {
            out.push(String::new());
            for frame_line in frame.split('\n') {
                out.push(format!("        {frame_line}"));
            }
            out.push(String::new());
        }
    }

    fn trace_line(&self, text: &str) -> String {
        format!("    {}", text.style(self.styles.trace))
    }

    fn trace_line_dim(&self, text: &str) -> String {
        format!("    {}", text.style(self.styles.trace_dim))
    }
}
