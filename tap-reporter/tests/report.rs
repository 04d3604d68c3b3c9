// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end TAP stream scenarios through the public API.

use camino::Utf8PathBuf;
use chrono::Utc;
use tap_reporter::{
    LogLevel, ReporterConfig, ReporterOutput, TapReporterBuilder,
    reporter::{
        AggregateStats, OutcomeCounts, RunOptions, SnapshotCounts, SuiteReport, TestOutcome,
        TestStatus,
    },
};

const ROOT: &str = "/work/project";

fn stats() -> AggregateStats {
    AggregateStats {
        suites: OutcomeCounts {
            failed: 1,
            pending: 0,
            passed: 1,
            total: 2,
        },
        tests: OutcomeCounts {
            failed: 1,
            pending: 1,
            passed: 2,
            total: 4,
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

fn passing_suite() -> SuiteReport {
    SuiteReport {
        file_path: format!("{ROOT}/src/pass.test.js").into(),
        outcomes: vec![
            outcome("adds", TestStatus::Passed, &[]),
            outcome("subtracts", TestStatus::Pending, &[]),
        ],
        execution_error: None,
        failing_count: 0,
    }
}

fn failing_suite() -> SuiteReport {
    SuiteReport {
        file_path: format!("{ROOT}/src/fail.test.js").into(),
        outcomes: vec![
            outcome("opens", TestStatus::Passed, &[]),
            outcome("closes", TestStatus::Failed, &["Error: bar closed"]),
        ],
        execution_error: None,
        failing_count: 1,
    }
}

fn run_report(builder: TapReporterBuilder, out: &mut String) {
    let mut reporter = builder
        .build(ReporterOutput::Buffer(out))
        .expect("reporter built");
    reporter
        .on_run_start(&stats(), &RunOptions::default())
        .expect("run start");
    reporter
        .on_test_result(&passing_suite(), &stats())
        .expect("suite 1");
    reporter
        .on_test_result(&failing_suite(), &stats())
        .expect("suite 2");
    reporter.on_run_complete(&stats()).expect("run complete");
    assert!(reporter.get_last_error().is_some(), "run had failures");
}

fn builder() -> TapReporterBuilder {
    let mut builder = TapReporterBuilder::default();
    builder.set_root(Utf8PathBuf::from(ROOT));
    builder
}

#[test]
fn produces_a_valid_tap_stream() {
    let mut out = String::new();
    run_report(builder(), &mut out);

    // Every line is blank, a comment, a result line, or the plan.
    for line in out.lines() {
        let valid = line.is_empty()
            || line.starts_with("# ")
            || line.starts_with("ok ")
            || line.starts_with("not ok ")
            || line == "1..4";
        assert!(valid, "TAP contract broken by line {line:?}");
    }

    // Result numbers appear in call order.
    let positions: Vec<usize> = ["ok 1 ", "ok 2 ", "ok 3 ", "not ok 4 "]
        .iter()
        .map(|needle| out.find(needle).unwrap_or_else(|| panic!("missing {needle:?}")))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    // The plan appears exactly once, after all result lines.
    assert_eq!(out.matches("1..4").count(), 1);
    assert!(out.trim_end().ends_with("1..4"));
}

#[test]
fn failure_diagnostics_follow_the_failing_result() {
    let mut out = String::new();
    run_report(builder(), &mut out);

    let failing = out.find("not ok 4 ").expect("failing result line");
    let headline = out.find("#   bar closed").expect("stripped headline");
    assert!(failing < headline, "diagnostics follow the result line");
}

#[test]
fn suite_badges_and_final_stats_are_reported() {
    let mut out = String::new();
    run_report(builder(), &mut out);

    assert!(out.contains(" PASS "), "got {out}");
    assert!(out.contains(" FAIL "), "got {out}");
    assert!(out.contains("src/pass.test.js"), "got {out}");
    assert!(out.contains("# Test Suites: "), "got {out}");
    assert!(out.contains("1 failed"), "got {out}");
    assert!(out.contains("# Ran all test suites."), "got {out}");
    assert!(out.contains("# Time:        "), "got {out}");
}

#[test]
fn error_level_keeps_results_and_diagnostics_only() {
    let mut out = String::new();
    let mut builder = builder();
    builder.set_log_level(LogLevel::Error);
    run_report(builder, &mut out);

    assert!(out.contains("ok 1 "), "result lines always appear: {out}");
    assert!(out.contains("not ok 4 "), "got {out}");
    assert!(out.contains("#   bar closed"), "diagnostics appear: {out}");
    assert!(out.trim_end().ends_with("1..4"), "plan always appears: {out}");
    assert!(!out.contains("# Starting..."), "info lines are gated: {out}");
    assert!(!out.contains("# Test Suites: "), "got {out}");
}

#[test]
fn config_round_trip_through_serde() {
    let config: ReporterConfig = serde_json::from_str(
        r#"{"logLevel": "WARN", "showInternalStackTraces": true, "showProgress": false}"#,
    )
    .expect("valid config");
    let mut out = String::new();
    let mut builder = TapReporterBuilder::from_config(config);
    builder.set_root(Utf8PathBuf::from(ROOT));
    run_report(builder, &mut out);
    assert!(!out.contains("# Starting..."), "WARN gates info lines: {out}");
    assert!(out.contains("#   bar closed"), "got {out}");
}

#[test]
fn file_output_is_plain_tap() {
    let dir = camino_tempfile::tempdir().expect("created temp dir");
    let path = dir.path().join("report.tap");

    let mut builder = builder();
    builder.set_file_path(path.clone());
    {
        let mut reporter = builder
            .build(ReporterOutput::Terminal)
            .expect("reporter built");
        reporter
            .on_test_result(&failing_suite(), &stats())
            .expect("suite");
        reporter.on_run_complete(&stats()).expect("run complete");
    }

    let contents = fs_err::read_to_string(path.as_std_path()).expect("report written");
    assert!(contents.contains("not ok 2 "), "got {contents}");
    assert!(!contents.contains('\u{1b}'), "no escape sequences: {contents}");
    assert!(contents.trim_end().ends_with("1..2"), "got {contents}");
}
