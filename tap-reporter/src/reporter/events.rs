// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured test-run results delivered by the host test runner.
//!
//! The reporter never mutates these: each suite report is consumed once per
//! report cycle, and each stats delivery is a full snapshot rather than a
//! delta.

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The status of one reported assertion.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TestStatus {
    /// The assertion passed.
    Passed,
    /// The assertion failed.
    Failed,
    /// The assertion was skipped or marked as todo.
    Pending,
}

/// One reported assertion result.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestOutcome {
    /// Titles of the enclosing describe blocks, outermost first.
    #[serde(default)]
    pub ancestor_titles: Vec<String>,
    /// The assertion's own title.
    pub title: String,
    /// Pass/fail/pending status.
    pub status: TestStatus,
    /// Raw failure messages (error summary plus captured stack trace each).
    #[serde(default)]
    pub failure_messages: Vec<String>,
}

/// One reported file/suite result.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReport {
    /// Absolute path of the test file.
    pub file_path: Utf8PathBuf,
    /// Per-assertion outcomes, in execution order.
    #[serde(default)]
    pub outcomes: Vec<TestOutcome>,
    /// A whole-suite execution error (e.g. a syntax error in the tested
    /// file), as raw stack text.
    #[serde(default)]
    pub execution_error: Option<String>,
    /// The number of failing assertions in this suite.
    #[serde(default)]
    pub failing_count: usize,
}

impl SuiteReport {
    /// Returns true if the suite failed, either through failing assertions
    /// or a whole-suite execution error.
    pub fn is_failing(&self) -> bool {
        self.failing_count > 0 || self.execution_error.is_some()
    }
}

/// Pass/fail/pending counters for suites or tests.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeCounts {
    /// How many failed.
    pub failed: usize,
    /// How many are pending.
    pub pending: usize,
    /// How many passed.
    pub passed: usize,
    /// The total count.
    pub total: usize,
}

/// Snapshot counters for a run.
///
/// `added` is its own category and never counts toward `passed`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCounts {
    /// How many snapshots failed to match.
    pub failed: usize,
    /// How many snapshots were updated.
    pub updated: usize,
    /// How many snapshots were newly written.
    pub added: usize,
    /// How many snapshots matched.
    pub passed: usize,
    /// The total count.
    pub total: usize,
}

/// Run-level counters, delivered in full on every per-suite and run-complete
/// event.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Suite counters.
    pub suites: OutcomeCounts,
    /// Test counters.
    pub tests: OutcomeCounts,
    /// Snapshot counters.
    #[serde(default)]
    pub snapshots: SnapshotCounts,
    /// When the run started.
    pub start_time: DateTime<Utc>,
}

impl AggregateStats {
    /// Returns true if any suite or test failed.
    pub fn has_failures(&self) -> bool {
        self.suites.failed > 0 || self.tests.failed > 0
    }
}

/// Options delivered with the run-start event.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    /// An advisory estimate of the whole run's duration, in seconds.
    #[serde(default)]
    pub estimated_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn suite_report_deserializes_from_host_payload() {
        let payload = r#"{
            "filePath": "/work/project/src/bar.test.js",
            "outcomes": [
                {
                    "ancestorTitles": ["bar"],
                    "title": "closes",
                    "status": "failed",
                    "failureMessages": ["Error: bar closed"]
                }
            ],
            "failingCount": 1
        }"#;
        let suite: SuiteReport = serde_json::from_str(payload).expect("valid payload");
        assert_eq!(suite.file_path, "/work/project/src/bar.test.js");
        assert_eq!(suite.outcomes.len(), 1);
        assert_eq!(suite.outcomes[0].status, TestStatus::Failed);
        assert!(suite.is_failing());
        assert_eq!(suite.execution_error, None);
    }

    #[test]
    fn failure_detection() {
        let mut suite = SuiteReport {
            file_path: "/t.js".into(),
            outcomes: Vec::new(),
            execution_error: None,
            failing_count: 0,
        };
        assert!(!suite.is_failing());
        suite.execution_error = Some("SyntaxError".to_owned());
        assert!(suite.is_failing());
    }
}
