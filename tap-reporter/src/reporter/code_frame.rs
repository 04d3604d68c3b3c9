// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::reporter::helpers::Styles;
use camino::Utf8Path;
use owo_colors::OwoColorize;
use swrite::{SWrite, swrite};

const LINES_ABOVE: usize = 4;
const LINES_BELOW: usize = 4;

/// Renders a short source-context snippet around a failing line.
///
/// Snippet enrichment is best-effort: an unreadable file or an out-of-range
/// location yields `None`, never an error.
pub(crate) fn format_code_frame(
    file: &Utf8Path,
    row: usize,
    column: usize,
    styles: &Styles,
) -> Option<String> {
    let source = fs_err::read_to_string(file).ok()?;
    let lines: Vec<&str> = source.lines().collect();
    if row == 0 || row > lines.len() {
        return None;
    }

    let start = row.saturating_sub(LINES_ABOVE + 1);
    let end = (row + LINES_BELOW).min(lines.len());
    let gutter_width = format!("{end}").len();

    let mut frame = String::new();
    for (index, text) in lines[start..end].iter().enumerate() {
        let number = start + index + 1;
        if !frame.is_empty() {
            frame.push('\n');
        }
        if number == row {
            swrite!(
                frame,
                "{} {number:>gutter_width$} {} {text}",
                ">".style(styles.fail_bold),
                "|".style(styles.dim),
            );
            if column > 0 {
                swrite!(
                    frame,
                    "\n  {:gutter_width$} {} {:>column$}",
                    "",
                    "|".style(styles.dim),
                    "^".style(styles.fail_bold),
                );
            }
        } else {
            swrite!(
                frame,
                "  {} {text}",
                format!("{number:>gutter_width$} |").style(styles.dim),
            );
        }
    }
    Some(frame)
}
