// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The host-facing reporter: consumes run lifecycle events and renders them
//! through the [`LineWriter`].

use crate::{
    config::ReporterConfig,
    errors::{OutputOpenError, RunFailedError, WriteEventError},
    logger::{LogLevel, Logger},
    output::{FileStream, StreamImpl, TerminalStream},
    reporter::{
        events::{AggregateStats, RunOptions, SuiteReport, TestOutcome, TestStatus},
        helpers::{Styles, ThemeCharacters},
        writer::LineWriter,
    },
};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use std::{io, slice};
use swrite::{SWrite, swrite};
use tracing::debug;

/// Report destination.
///
/// This is usually the console, but can be an in-memory buffer for tests and
/// embedding.
pub enum ReporterOutput<'a> {
    /// Produce output on the console, or on the configured output file when
    /// one is set.
    Terminal,

    /// Write output to a buffer.
    Buffer(&'a mut String),
}

/// TAP reporter builder.
#[derive(Debug, Default)]
pub struct TapReporterBuilder {
    config: ReporterConfig,
    colorize: Option<bool>,
}

impl TapReporterBuilder {
    /// Creates a builder from a deserialized configuration.
    pub fn from_config(config: ReporterConfig) -> Self {
        Self {
            config,
            colorize: None,
        }
    }

    /// Sets the verbosity threshold.
    pub fn set_log_level(&mut self, log_level: LogLevel) -> &mut Self {
        self.config.log_level = log_level;
        self
    }

    /// Redirects the report to a file, disabling color and progress.
    pub fn set_file_path(&mut self, file_path: Utf8PathBuf) -> &mut Self {
        self.config.file_path = Some(file_path);
        self
    }

    /// Forces transient progress on or off.
    pub fn set_show_progress(&mut self, show_progress: bool) -> &mut Self {
        self.config.show_progress = Some(show_progress);
        self
    }

    /// Sets whether the run header is emitted.
    pub fn set_show_header(&mut self, show_header: bool) -> &mut Self {
        self.config.show_header = show_header;
        self
    }

    /// Sets whether internal stack frames are included in failure output.
    pub fn set_show_internal_stack_traces(&mut self, show: bool) -> &mut Self {
        self.config.show_internal_stack_traces = show;
        self
    }

    /// Sets the directory paths are reported relative to.
    pub fn set_root(&mut self, root: Utf8PathBuf) -> &mut Self {
        self.config.root = Some(root);
        self
    }

    /// Forces color styling on or off. File output is always plain.
    pub fn set_colorize(&mut self, colorize: bool) -> &mut Self {
        self.colorize = Some(colorize);
        self
    }

    /// Builds the reporter, opening the configured output file if one is
    /// set.
    pub fn build(self, output: ReporterOutput<'_>) -> Result<TapReporter<'_>, OutputOpenError> {
        let root = self.config.root.clone().unwrap_or_else(current_root);

        let (stream, interactive) = match output {
            ReporterOutput::Terminal => match &self.config.file_path {
                Some(path) => {
                    let file = fs_err::File::create(path)
                        .map_err(|err| OutputOpenError::new(path.clone(), err))?;
                    (StreamImpl::File(FileStream::new(file)), false)
                }
                None => {
                    let terminal = TerminalStream::new();
                    let interactive = terminal.is_terminal();
                    (StreamImpl::Terminal(terminal), interactive)
                }
            },
            ReporterOutput::Buffer(buf) => (StreamImpl::Buffer(buf), false),
        };

        let mut styles = Box::<Styles>::default();
        let colorize = self.colorize.unwrap_or_else(|| {
            interactive && supports_color::on_cached(supports_color::Stream::Stdout).is_some()
        });
        if colorize && self.config.file_path.is_none() {
            styles.colorize();
        }

        let mut theme = ThemeCharacters::default();
        match &stream {
            StreamImpl::Terminal(_) => {
                if supports_unicode::on(supports_unicode::Stream::Stdout) {
                    theme.use_unicode();
                }
            }
            // Always use Unicode for internal buffers; files stay ASCII.
            StreamImpl::Buffer(_) => theme.use_unicode(),
            StreamImpl::File(_) => {}
        }

        let show_progress = self.config.show_progress.unwrap_or_else(|| {
            interactive && self.config.file_path.is_none() && !is_ci::uncached()
        });
        debug!(
            show_progress,
            colorize,
            root = root.as_str(),
            "resolved reporter configuration"
        );

        let logger = Logger::new(stream, self.config.log_level);
        Ok(TapReporter {
            writer: LineWriter::new(logger, root, styles, theme),
            show_progress,
            show_header: self.config.show_header,
            show_internal_stack_traces: self.config.show_internal_stack_traces,
            estimated_seconds: None,
            should_fail: false,
        })
    }
}

fn current_root() -> Utf8PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."))
}

/// Renders test-run lifecycle events as console/TAP output.
///
/// Event handlers are synchronous and single-threaded: each event is fully
/// processed, including any buffered flush, before control returns to the
/// host. The reporter is expected to be discarded after
/// [`on_run_complete`](Self::on_run_complete).
pub struct TapReporter<'a> {
    writer: LineWriter<StreamImpl<'a>>,
    show_progress: bool,
    show_header: bool,
    show_internal_stack_traces: bool,
    estimated_seconds: Option<u64>,
    should_fail: bool,
}

impl TapReporter<'_> {
    /// Handles the run-start event.
    pub fn on_run_start(
        &mut self,
        stats: &AggregateStats,
        options: &RunOptions,
    ) -> Result<(), WriteEventError> {
        self.estimated_seconds = options.estimated_seconds;
        if self.show_header {
            self.writer.start(Some(stats.suites.total))?;
        }
        Ok(())
    }

    /// Handles one completed suite: emits its header, result lines and
    /// failure diagnostics as one buffered batch, with transient progress
    /// appended when enabled.
    pub fn on_test_result(
        &mut self,
        suite: &SuiteReport,
        stats: &AggregateStats,
    ) -> Result<(), WriteEventError> {
        self.writer.logger_mut().buffer();
        self.write_suite(suite)?;

        if self.show_progress {
            self.writer.logger_mut().temporary()?;
            self.writer.blank()?;
            self.writer.aggregated_results(stats, self.estimated_seconds)?;
            self.writer.blank()?;
            if let Some(estimate) = self.estimated_seconds
                && estimate > 0
            {
                let elapsed = Utc::now()
                    .signed_duration_since(stats.start_time)
                    .num_milliseconds() as f64
                    / 1e3;
                self.writer.time_progress_bar(elapsed / estimate as f64)?;
            }
        }

        self.writer.logger_mut().flush()?;
        if suite.is_failing() {
            self.should_fail = true;
        }
        Ok(())
    }

    /// Handles the run-complete event: final stats and the TAP plan.
    pub fn on_run_complete(&mut self, stats: &AggregateStats) -> Result<(), WriteEventError> {
        if stats.has_failures() {
            self.should_fail = true;
        }

        self.writer.blank()?;
        self.writer.aggregated_results(stats, self.estimated_seconds)?;
        self.writer.blank()?;
        self.writer.comment_light("Ran all test suites.")?;
        self.writer.blank()?;
        self.writer.plan(None)?;
        self.writer.logger_mut().flush()?;
        Ok(())
    }

    /// Returns the failure signal for the host's exit code, if any test or
    /// suite failed. Reading the signal does not mutate it.
    pub fn get_last_error(&self) -> Option<RunFailedError> {
        self.should_fail.then_some(RunFailedError)
    }

    fn write_suite(&mut self, suite: &SuiteReport) -> io::Result<()> {
        self.writer.blank()?;

        let dir = suite.file_path.parent().unwrap_or(Utf8Path::new(""));
        let base = suite.file_path.file_name().unwrap_or(suite.file_path.as_str());
        self.writer.suite(suite.is_failing(), dir, base)?;

        if let Some(error) = &suite.execution_error {
            return self
                .writer
                .errors(slice::from_ref(error), self.show_internal_stack_traces);
        }

        for outcome in &suite.outcomes {
            let title = self.display_title(outcome);
            match outcome.status {
                TestStatus::Passed => self.writer.passed(&title)?,
                TestStatus::Failed => {
                    self.writer.failed(&title)?;
                    self.writer
                        .errors(&outcome.failure_messages, self.show_internal_stack_traces)?;
                }
                TestStatus::Pending => self.writer.skipped(&title)?,
            }
        }
        Ok(())
    }

    fn display_title(&self, outcome: &TestOutcome) -> String {
        if outcome.ancestor_titles.is_empty() {
            return outcome.title.clone();
        }
        let separator = self.writer.theme().title_separator;
        let mut title = outcome.ancestor_titles.join(separator);
        swrite!(title, "{separator}{}", outcome.title);
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::events::{OutcomeCounts, SnapshotCounts};
    use pretty_assertions::assert_eq;

    fn builder() -> TapReporterBuilder {
        let mut builder = TapReporterBuilder::default();
        builder.set_root(Utf8PathBuf::from("/work/project"));
        builder
    }

    fn stats(suites_failed: usize, tests_failed: usize) -> AggregateStats {
        AggregateStats {
            suites: OutcomeCounts {
                failed: suites_failed,
                pending: 0,
                passed: 2 - suites_failed,
                total: 2,
            },
            tests: OutcomeCounts {
                failed: tests_failed,
                pending: 0,
                passed: 2 - tests_failed,
                total: 2,
            },
            snapshots: SnapshotCounts::default(),
            start_time: Utc::now(),
        }
    }

    fn outcome(title: &str, status: TestStatus, failure_messages: &[&str]) -> TestOutcome {
        TestOutcome {
            ancestor_titles: Vec::new(),
            title: title.to_owned(),
            status,
            failure_messages: failure_messages.iter().map(|m| (*m).to_owned()).collect(),
        }
    }

    #[test]
    fn passing_run_reports_no_error() {
        let mut out = String::new();
        let mut reporter = builder().build(ReporterOutput::Buffer(&mut out)).unwrap();

        let suite = SuiteReport {
            file_path: "/work/project/src/a.test.js".into(),
            outcomes: vec![outcome("works", TestStatus::Passed, &[])],
            execution_error: None,
            failing_count: 0,
        };
        reporter.on_run_start(&stats(0, 0), &RunOptions::default()).unwrap();
        reporter.on_test_result(&suite, &stats(0, 0)).unwrap();
        reporter.on_run_complete(&stats(0, 0)).unwrap();

        assert_eq!(reporter.get_last_error(), None);
        // Reading the signal is idempotent.
        assert_eq!(reporter.get_last_error(), None);
        assert!(out.contains("ok 1 — works"), "got {out}");
        assert!(out.trim_end().ends_with("1..1"), "plan comes last: {out}");
    }

    #[test]
    fn failing_tests_produce_the_failure_signal() {
        let mut out = String::new();
        let mut reporter = builder().build(ReporterOutput::Buffer(&mut out)).unwrap();

        let suite = SuiteReport {
            file_path: "/work/project/src/bar.test.js".into(),
            outcomes: vec![
                outcome("a", TestStatus::Passed, &[]),
                outcome("b", TestStatus::Failed, &["Error: bar closed"]),
            ],
            execution_error: None,
            failing_count: 1,
        };
        reporter.on_test_result(&suite, &stats(1, 1)).unwrap();
        reporter.on_run_complete(&stats(1, 1)).unwrap();

        assert_eq!(reporter.get_last_error(), Some(RunFailedError));
        assert_eq!(reporter.get_last_error(), Some(RunFailedError));

        let ok_line = out.find("ok 1 — a").expect("passed line");
        let not_ok_line = out.find("not ok 2 ● b").expect("failed line");
        let diagnostic = out.find("#   bar closed").expect("diagnostic headline");
        assert!(ok_line < not_ok_line && not_ok_line < diagnostic);
        assert!(!out.contains("Stack:"), "no frames were supplied: {out}");
        assert!(out.trim_end().ends_with("1..2"), "plan comes last: {out}");
    }

    #[test]
    fn execution_errors_render_without_consuming_a_number() {
        let mut out = String::new();
        let mut reporter = builder().build(ReporterOutput::Buffer(&mut out)).unwrap();

        let broken = SuiteReport {
            file_path: "/work/project/src/broken.test.js".into(),
            outcomes: Vec::new(),
            execution_error: Some("Error: unexpected token".to_owned()),
            failing_count: 0,
        };
        let working = SuiteReport {
            file_path: "/work/project/src/ok.test.js".into(),
            outcomes: vec![outcome("still numbered first", TestStatus::Passed, &[])],
            execution_error: None,
            failing_count: 0,
        };
        reporter.on_test_result(&broken, &stats(1, 0)).unwrap();
        reporter.on_test_result(&working, &stats(1, 0)).unwrap();
        reporter.on_run_complete(&stats(1, 0)).unwrap();

        assert_eq!(reporter.get_last_error(), Some(RunFailedError));
        assert!(out.contains(" FAIL "), "got {out}");
        assert!(out.contains("#   unexpected token"), "got {out}");
        assert!(out.contains("ok 1 — still numbered first"), "got {out}");
    }

    #[test]
    fn header_announces_the_suite_count() {
        let mut out = String::new();
        let mut reporter = builder().build(ReporterOutput::Buffer(&mut out)).unwrap();
        reporter.on_run_start(&stats(0, 0), &RunOptions::default()).unwrap();
        assert!(out.contains("# Starting..."), "got {out}");
        assert!(out.contains("# 2 test suites found."), "got {out}");
    }

    #[test]
    fn header_can_be_disabled() {
        let mut out = String::new();
        let mut builder = builder();
        builder.set_show_header(false);
        let mut reporter = builder.build(ReporterOutput::Buffer(&mut out)).unwrap();
        reporter.on_run_start(&stats(0, 0), &RunOptions::default()).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn ancestor_titles_join_the_display_title() {
        let mut out = String::new();
        let mut reporter = builder().build(ReporterOutput::Buffer(&mut out)).unwrap();
        let suite = SuiteReport {
            file_path: "/work/project/src/a.test.js".into(),
            outcomes: vec![TestOutcome {
                ancestor_titles: vec!["outer".to_owned(), "inner".to_owned()],
                title: "works".to_owned(),
                status: TestStatus::Passed,
                failure_messages: Vec::new(),
            }],
            execution_error: None,
            failing_count: 0,
        };
        reporter.on_test_result(&suite, &stats(0, 0)).unwrap();
        assert!(out.contains("outer › inner › works"), "got {out}");
    }

    #[test]
    fn progress_requires_buffering_support() {
        // Buffers are not interactive, so the default resolution turns
        // progress off and the output contains no transient stats.
        let mut out = String::new();
        let mut reporter = builder().build(ReporterOutput::Buffer(&mut out)).unwrap();
        let suite = SuiteReport {
            file_path: "/work/project/src/a.test.js".into(),
            outcomes: vec![outcome("works", TestStatus::Passed, &[])],
            execution_error: None,
            failing_count: 0,
        };
        reporter.on_test_result(&suite, &stats(0, 0)).unwrap();
        assert!(!out.contains("Test Suites"), "got {out}");
    }

    #[test]
    fn forced_progress_appends_transient_stats_per_suite() {
        let mut out = String::new();
        let mut builder = builder();
        builder.set_show_progress(true);
        let mut reporter = builder.build(ReporterOutput::Buffer(&mut out)).unwrap();
        let suite = SuiteReport {
            file_path: "/work/project/src/a.test.js".into(),
            outcomes: vec![outcome("works", TestStatus::Passed, &[])],
            execution_error: None,
            failing_count: 0,
        };
        reporter.on_test_result(&suite, &stats(0, 0)).unwrap();
        assert!(out.contains("# Test Suites: "), "got {out}");
        assert!(out.contains("# Tests:       "), "got {out}");
    }
}
