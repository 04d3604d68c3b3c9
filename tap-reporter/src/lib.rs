// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A TAP (Test Anything Protocol) reporter for structured test-run results.
//!
//! This crate is a presentation layer for an external test-running host: it
//! consumes run-start, per-suite-result and run-complete events and renders
//! them as human-readable console output and a TAP stream. It owns no test
//! execution, no scheduling and no discovery; all state is per-run,
//! in-memory and transient.
//!
//! The interesting machinery is the incremental line writer, which assigns
//! monotonically increasing TAP test numbers, buffers and erases transient
//! progress output on cursor-capable terminals, and reformats raw failure
//! messages into annotated diagnostic blocks with vendor frames
//! de-emphasized and user frames enriched with source snippets.
//!
//! ```
//! use tap_reporter::{
//!     config::ReporterConfig,
//!     reporter::{
//!         AggregateStats, OutcomeCounts, ReporterOutput, RunOptions, SnapshotCounts,
//!         SuiteReport, TapReporterBuilder, TestOutcome, TestStatus,
//!     },
//! };
//!
//! let stats = AggregateStats {
//!     suites: OutcomeCounts { failed: 0, pending: 0, passed: 1, total: 1 },
//!     tests: OutcomeCounts { failed: 0, pending: 0, passed: 1, total: 1 },
//!     snapshots: SnapshotCounts::default(),
//!     start_time: chrono::Utc::now(),
//! };
//! let suite = SuiteReport {
//!     file_path: "/work/project/src/a.test.js".into(),
//!     outcomes: vec![TestOutcome {
//!         ancestor_titles: vec![],
//!         title: "works".to_owned(),
//!         status: TestStatus::Passed,
//!         failure_messages: vec![],
//!     }],
//!     execution_error: None,
//!     failing_count: 0,
//! };
//!
//! let mut out = String::new();
//! let mut builder = TapReporterBuilder::from_config(ReporterConfig::default());
//! builder.set_root("/work/project".into());
//! let mut reporter = builder.build(ReporterOutput::Buffer(&mut out)).unwrap();
//!
//! reporter.on_run_start(&stats, &RunOptions::default()).unwrap();
//! reporter.on_test_result(&suite, &stats).unwrap();
//! reporter.on_run_complete(&stats).unwrap();
//! assert!(reporter.get_last_error().is_none());
//! assert!(out.contains("ok 1"));
//! ```

pub mod config;
pub mod errors;
pub mod logger;
pub mod output;
pub mod reporter;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::ReporterConfig;
pub use logger::{LogLevel, Logger};
pub use reporter::{ReporterOutput, TapReporter, TapReporterBuilder};
