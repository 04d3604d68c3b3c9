// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single point that emits all report lines in TAP-compatible form.

use crate::{
    errors::WriteEventError,
    logger::Logger,
    output::OutputStream,
    reporter::{
        events::AggregateStats,
        failure::FailureFormatter,
        helpers::{Styles, ThemeCharacters, format_comment, relative_to, render_bar, stats_bar},
    },
};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use owo_colors::OwoColorize;
use std::io;
use swrite::{SWrite, swrite};

const KEY_WIDTH: usize = 12;

/// Emits TAP result lines, aggregate stats, suite headers and the one-shot
/// plan.
///
/// Owns the run's sequence counter: every call to [`result`](Self::result)
/// draws a fresh number, so call order is numbering order.
#[derive(Debug)]
pub struct LineWriter<S> {
    logger: Logger<S>,
    root: Utf8PathBuf,
    styles: Box<Styles>,
    theme: ThemeCharacters,
    counter: u64,
    plan_written: bool,
}

impl<S: OutputStream> LineWriter<S> {
    /// Creates a new writer reporting paths relative to `root`.
    pub(crate) fn new(
        logger: Logger<S>,
        root: Utf8PathBuf,
        styles: Box<Styles>,
        theme: ThemeCharacters,
    ) -> Self {
        Self {
            logger,
            root,
            styles,
            theme,
            counter: 0,
            plan_written: false,
        }
    }

    /// Increments and returns the TAP test-point counter.
    pub fn next_number(&mut self) -> u64 {
        self.counter += 1;
        self.counter
    }

    pub(crate) fn logger_mut(&mut self) -> &mut Logger<S> {
        &mut self.logger
    }

    pub(crate) fn theme(&self) -> &ThemeCharacters {
        &self.theme
    }

    /// Emits a blank line at info severity.
    pub fn blank(&mut self) -> io::Result<()> {
        self.logger.info("")
    }

    /// Emits a TAP comment line at info severity.
    pub fn comment(&mut self, line: &str) -> io::Result<()> {
        let comment = format_comment(line, &self.styles);
        self.logger.info(&comment)
    }

    /// Emits each line of `text` as a TAP comment.
    pub fn comment_block(&mut self, text: &str) -> io::Result<()> {
        for line in text.split('\n') {
            self.comment(line)?;
        }
        Ok(())
    }

    /// Emits a de-emphasized TAP comment line.
    pub fn comment_light(&mut self, line: &str) -> io::Result<()> {
        let dimmed = line.style(self.styles.dim).to_string();
        self.comment(&dimmed)
    }

    /// Emits the run header: two blank lines, a "Starting..." comment and,
    /// when known, the number of suites found.
    pub fn start(&mut self, suite_count: Option<usize>) -> io::Result<()> {
        self.blank()?;
        self.blank()?;
        let starting = "Starting...".style(self.styles.pass).to_string();
        self.comment(&starting)?;

        if let Some(count) = suite_count
            && count > 0
        {
            self.comment_light(&format!("{count} test suites found."))?;
        }
        Ok(())
    }

    /// Emits a comment with a left-padded label and a value.
    pub fn key_value(&mut self, label: &str, value: &str) -> io::Result<()> {
        let key = format!("{:<KEY_WIDTH$}", format!("{label}:"));
        let line = format!("{} {value}", key.style(self.styles.bold));
        self.comment(&line)
    }

    /// Emits a comment with a label and a comma-joined list of values.
    pub fn key_value_list(&mut self, label: &str, items: &[String]) -> io::Result<()> {
        self.key_value(label, &items.join(", "))
    }

    /// Emits one stats line: proportion bar, then conditional failed /
    /// skipped / passed fragments, then the total.
    ///
    /// A zero total shows only `0 total`.
    pub fn stats(
        &mut self,
        name: &str,
        failed: usize,
        skipped: usize,
        passed: usize,
        total: usize,
    ) -> io::Result<()> {
        let mut items = Vec::new();

        if total > 0 {
            let percent = passed as f64 / total as f64;
            items.push(stats_bar(percent, failed > 0, &self.styles, &self.theme));

            if failed > 0 {
                items.push(
                    format!("{failed} failed")
                        .style(self.styles.fail_bold)
                        .to_string(),
                );
            }
            if skipped > 0 {
                items.push(
                    format!("{skipped} skipped")
                        .style(self.styles.skip_bold)
                        .to_string(),
                );
            }
            if passed > 0 {
                items.push(
                    format!("{passed} passed")
                        .style(self.styles.pass_bold)
                        .to_string(),
                );
            }
        }

        items.push(format!("{total} total"));
        self.key_value_list(name, &items)
    }

    /// Emits the snapshot stats line; a no-op when the total is zero.
    ///
    /// `added` and `updated` are their own categories: the bar only renders
    /// in the alert color when snapshots went unmatched without any being
    /// added or updated.
    pub fn snapshots(
        &mut self,
        failed: usize,
        updated: usize,
        added: usize,
        passed: usize,
        total: usize,
    ) -> io::Result<()> {
        if total == 0 {
            return Ok(());
        }

        let percent = passed as f64 / total as f64;
        let has_errors = percent < 1.0 && updated == 0 && added == 0;
        let mut items = vec![stats_bar(percent, has_errors, &self.styles, &self.theme)];

        if failed > 0 {
            items.push(
                format!("{failed} failed")
                    .style(self.styles.fail_bold)
                    .to_string(),
            );
        }
        if updated > 0 {
            items.push(
                format!("{updated} updated")
                    .style(self.styles.skip_bold)
                    .to_string(),
            );
        }
        if added > 0 {
            items.push(
                format!("{added} added")
                    .style(self.styles.pass_bold)
                    .to_string(),
            );
        }
        if passed > 0 {
            items.push(
                format!("{passed} passed")
                    .style(self.styles.pass_bold)
                    .to_string(),
            );
        }
        items.push(format!("{total} total"));

        self.key_value_list("Snapshots", &items)
    }

    /// Emits the canonical TAP result line, drawing a fresh test number.
    pub fn result(&mut self, status_label: &str, title: &str) -> io::Result<()> {
        let number = self.next_number();
        let line = format!(
            "{status_label} {} {title}",
            number.style(self.styles.count)
        );
        self.logger.log(&line)
    }

    /// Emits an `ok` line for a passed test.
    pub fn passed(&mut self, title: &str) -> io::Result<()> {
        let label = "ok".style(self.styles.pass).to_string();
        let title = if title.is_empty() {
            String::new()
        } else {
            format!("{} {title}", self.theme.em_dash)
        };
        self.result(&label, &title)
    }

    /// Emits a `not ok` line for a failed test.
    pub fn failed(&mut self, title: &str) -> io::Result<()> {
        let label = "not ok".style(self.styles.fail).to_string();
        let title = format!("{} {title}", self.theme.circle)
            .style(self.styles.fail_bold)
            .to_string();
        self.result(&label, &title)
    }

    /// Emits an `ok` line with a `# SKIP` directive for a pending test.
    pub fn skipped(&mut self, title: &str) -> io::Result<()> {
        let label = "ok".style(self.styles.skip).to_string();
        let title = format!(
            "{} {} {}",
            "#".style(self.styles.skip),
            "SKIP".style(self.styles.skip_bold),
            title.style(self.styles.skip),
        );
        self.result(&label, &title)
    }

    /// Formats and emits failure messages at error severity; a no-op when
    /// there are none.
    pub fn errors(&mut self, messages: &[String], show_internal_frames: bool) -> io::Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let formatter = FailureFormatter::new(&self.root, &self.styles, show_internal_frames);
        let formatted: Vec<String> = messages
            .iter()
            .map(|message| formatter.format_message(message))
            .collect();
        self.logger.error(&formatted.join("\n"))
    }

    /// Emits the suite header: a PASS/FAIL badge and the suite path relative
    /// to the configured root.
    pub fn suite(&mut self, is_failing: bool, dir: &Utf8Path, base: &str) -> io::Result<()> {
        let badge = if is_failing {
            " FAIL ".style(self.styles.badge_fail).to_string()
        } else {
            " PASS ".style(self.styles.badge_pass).to_string()
        };
        let dir = format!("{}{}", relative_to(&self.root, dir), std::path::MAIN_SEPARATOR);
        let line = format!(
            "{badge} {}{}",
            dir.style(self.styles.trace),
            base.style(self.styles.bold),
        );
        self.comment(&line)
    }

    /// Emits the TAP plan line (`1..N`).
    ///
    /// Without an explicit count, the current counter value is used. The
    /// plan can be written only once per writer lifetime; a second call is a
    /// caller bug and fails.
    pub fn plan(&mut self, count: Option<u64>) -> Result<(), WriteEventError> {
        if self.plan_written {
            return Err(crate::errors::PlanAlreadyWrittenError.into());
        }

        let count = count.unwrap_or(self.counter);
        let line = format!("1..{count}").style(self.styles.plan).to_string();
        self.logger.log(&line)?;
        self.plan_written = true;
        Ok(())
    }

    /// Emits suite stats, test stats, snapshot stats (when any snapshots
    /// exist) and the elapsed-time line.
    pub fn aggregated_results(
        &mut self,
        stats: &AggregateStats,
        estimated_seconds: Option<u64>,
    ) -> io::Result<()> {
        self.stats(
            "Test Suites",
            stats.suites.failed,
            stats.suites.pending,
            stats.suites.passed,
            stats.suites.total,
        )?;
        self.stats(
            "Tests",
            stats.tests.failed,
            stats.tests.pending,
            stats.tests.passed,
            stats.tests.total,
        )?;
        if stats.snapshots.total > 0 {
            self.snapshots(
                stats.snapshots.failed,
                stats.snapshots.updated,
                stats.snapshots.added,
                stats.snapshots.passed,
                stats.snapshots.total,
            )?;
        }

        let elapsed = Utc::now().signed_duration_since(stats.start_time);
        let seconds = elapsed.num_milliseconds() as f64 / 1e3;
        let mut time_value = format!("{seconds:.3}s");
        if let Some(estimate) = estimated_seconds {
            swrite!(time_value, ", estimated {estimate}s");
        }
        self.key_value("Time", &time_value)
    }

    /// Writes a full-width elapsed/estimated proportion bar, without a
    /// trailing newline, as transient progress content.
    ///
    /// Skipped when the run is past its estimate or the stream width is
    /// unknown.
    pub fn time_progress_bar(&mut self, percentage: f64) -> io::Result<()> {
        if percentage > 1.0 {
            return Ok(());
        }
        let Some(columns) = self.logger.stream_columns() else {
            return Ok(());
        };

        let bar = render_bar(columns, percentage, &self.theme)
            .style(self.styles.trace_dim)
            .to_string();
        self.logger.write(&bar)
    }
}
