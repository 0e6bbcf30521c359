//! Parser tests over full RF 6 and RF 7 documents.

use chrono::{Duration, TimeZone, Utc};
use robot_results_lib::models::TestStatus;
use robot_results_lib::services::robot::{RobotParseError, parse_output_xml};

use super::test_helpers::{RF6_OUTPUT, RF7_OUTPUT, fixed_now};

#[test]
fn test_rf6_document_run_fields() {
    let run = parse_output_xml(RF6_OUTPUT, fixed_now()).unwrap();

    assert_eq!(run.name, "Acceptance");
    assert_eq!(run.generator, "Robot 6.1.1 (Python 3.11.4 on linux)");
    assert_eq!(run.host.as_deref(), Some("ci-runner-01"));

    let start = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
    assert_eq!(run.started_at, start);
    assert_eq!(run.duration, Some(90_500));
    assert_eq!(run.ended_at, Some(start + Duration::milliseconds(90_500)));

    assert_eq!(run.total, 4);
    assert_eq!(run.passed, 2);
    assert_eq!(run.failed, 1);
    assert_eq!(run.skipped, 1);
}

#[test]
fn test_rf6_document_flattens_leaf_suites_in_order() {
    let run = parse_output_xml(RF6_OUTPUT, fixed_now()).unwrap();

    let names: Vec<&str> = run.suites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Login", "Users"]);

    let login = &run.suites[0];
    assert_eq!(login.source.as_deref(), Some("/work/tests/login.robot"));
    assert_eq!(login.duration, Some(3_700));
    assert_eq!(run.suites[1].duration, Some(1_200));
}

#[test]
fn test_rf6_document_test_cases() {
    let run = parse_output_xml(RF6_OUTPUT, fixed_now()).unwrap();
    let login = &run.suites[0];

    let valid = &login.tests[0];
    assert_eq!(valid.name, "Valid Login");
    assert_eq!(valid.status, TestStatus::Pass);
    assert_eq!(valid.duration, Some(2_250));
    assert_eq!(valid.tags, vec!["login", "smoke"]);
    assert_eq!(valid.message, None);

    // Test status wins over the nested keyword status
    let invalid = &login.tests[1];
    assert_eq!(invalid.status, TestStatus::Fail);
    assert_eq!(invalid.duration, Some(800));
    assert_eq!(
        invalid.message.as_deref(),
        Some("Error page should have been displayed")
    );

    let skipped = &run.suites[1].tests[1];
    assert_eq!(skipped.status, TestStatus::Skip);
    assert_eq!(skipped.duration, Some(0));
    assert_eq!(skipped.message.as_deref(), Some("Skipped until cleanup lands"));
    assert_eq!(skipped.tags, vec!["wip"]);
}

#[test]
fn test_rf7_document_run_fields() {
    let run = parse_output_xml(RF7_OUTPUT, fixed_now()).unwrap();

    assert_eq!(run.name, "Nightly");
    assert!(run.generator.starts_with("Robot 7.0.1"));
    assert_eq!(run.host.as_deref(), Some("build-agent-7"));

    let start = Utc.with_ymd_and_hms(2024, 3, 16, 10, 0, 0).unwrap();
    assert_eq!(run.started_at, start);
    assert_eq!(run.duration, Some(12_345));
    assert_eq!(run.ended_at, Some(start + Duration::milliseconds(12_345)));

    assert_eq!((run.total, run.passed, run.failed, run.skipped), (3, 1, 1, 1));
    assert_eq!(run.test_count(), 3);
}

#[test]
fn test_rf7_root_suite_with_tests_is_a_leaf() {
    let run = parse_output_xml(RF7_OUTPUT, fixed_now()).unwrap();

    let names: Vec<&str> = run.suites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Nightly", "API"]);
    assert_eq!(run.suites[0].duration, Some(12_345));
    assert_eq!(run.suites[1].duration, Some(1_400));
}

#[test]
fn test_rf7_document_test_cases() {
    let run = parse_output_xml(RF7_OUTPUT, fixed_now()).unwrap();

    let smoke = &run.suites[0].tests[0];
    assert_eq!(smoke.duration, Some(500));
    assert_eq!(smoke.tags, vec!["smoke"]);

    let api = &run.suites[1];
    assert_eq!(api.tests[0].status, TestStatus::Fail);
    assert_eq!(api.tests[0].duration, Some(1_250));
    assert_eq!(
        api.tests[0].message.as_deref(),
        Some("Expected status 200 but got 500")
    );
    assert_eq!(api.tests[0].tags, vec!["api", "regression"]);

    // Unknown statuses count as skipped
    assert_eq!(api.tests[1].status, TestStatus::Skip);
    assert_eq!(api.tests[1].duration, Some(0));
}

#[test]
fn test_suite_counts_sum_to_run_totals() {
    for xml in [RF6_OUTPUT, RF7_OUTPUT] {
        let run = parse_output_xml(xml, fixed_now()).unwrap();
        let mut total = 0;
        let mut passed = 0;
        for suite in &run.suites {
            let counts = suite.counts();
            assert_eq!(
                counts.total,
                counts.passed + counts.failed + counts.skipped
            );
            total += counts.total;
            passed += counts.passed;
        }
        assert_eq!(total, run.total);
        assert_eq!(passed, run.passed);
    }
}

#[test]
fn test_rejects_documents_without_robot_root() {
    let err = parse_output_xml("<testsuites><testsuite/></testsuites>", fixed_now()).unwrap_err();
    assert!(matches!(err, RobotParseError::InvalidFormat(_)));

    let err = parse_output_xml("<robot generator=\"x\"></robot>", fixed_now()).unwrap_err();
    assert!(matches!(err, RobotParseError::InvalidFormat(_)));
}

#[test]
fn test_rejects_truncated_document() {
    let truncated = &RF7_OUTPUT[..RF7_OUTPUT.len() / 2];
    assert!(parse_output_xml(truncated, fixed_now()).is_err());
}
