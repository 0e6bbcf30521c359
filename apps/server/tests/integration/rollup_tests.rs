//! Rollups computed over parsed fixture documents.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone, Utc};
use robot_results_lib::models::{ParsedTestRun, RunSummary};
use robot_results_lib::services::robot::parse_output_xml;
use robot_results_lib::services::rollup::{
    self, DateWindow, NO_DATA, RunSample, SuiteGroup, overview::RunSums,
};

use super::test_helpers::{RF6_OUTPUT, RF7_OUTPUT, fixed_now};

fn parse(xml: &str) -> ParsedTestRun {
    parse_output_xml(xml, fixed_now()).unwrap()
}

fn run_sample(run: &ParsedTestRun) -> RunSample {
    RunSample {
        host: run.host.clone(),
        started_at: run.started_at,
        total: i64::from(run.total),
        passed: i64::from(run.passed),
        failed: i64::from(run.failed),
        skipped: i64::from(run.skipped),
    }
}

/// Suites of the given runs grouped by name, the way storage groups them.
fn suite_groups(runs: &[&ParsedTestRun]) -> Vec<SuiteGroup> {
    let mut groups: BTreeMap<&str, SuiteGroup> = BTreeMap::new();

    for suite in runs.iter().flat_map(|run| run.suites.iter()) {
        let counts = suite.counts();
        let group = groups.entry(suite.name.as_str()).or_insert_with(|| SuiteGroup {
            name: suite.name.clone(),
            ..Default::default()
        });
        group.occurrences += 1;
        group.total += i64::from(counts.total);
        group.passed += i64::from(counts.passed);
        group.failed += i64::from(counts.failed);
        group.skipped += i64::from(counts.skipped);
        if let Some(ms) = suite.duration {
            group.duration_sum += ms;
            group.timed_occurrences += 1;
        }
    }

    groups.into_values().collect()
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

#[test]
fn test_trend_over_both_schema_generations() {
    let runs = vec![run_sample(&parse(RF7_OUTPUT)), run_sample(&parse(RF6_OUTPUT))];

    let report = rollup::trend_report(&runs);

    let dates: Vec<NaiveDate> = report.trend.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![date(15), date(16)]);

    assert_eq!(report.trend[0].total, 4);
    assert_eq!(report.trend[0].pass_rate, 50.0);
    assert_eq!(report.trend[1].total, 3);
    assert_eq!(report.trend[1].pass_rate, 33.3);

    assert_eq!(report.summary.runs, 2);
    assert_eq!(report.summary.total, 7);
    assert_eq!(report.summary.passed, 3);
    assert_eq!(report.summary.pass_rate, 42.9);
}

#[test]
fn test_host_report_over_fixture_runs() {
    let runs = vec![run_sample(&parse(RF6_OUTPUT)), run_sample(&parse(RF7_OUTPUT))];
    let now = Utc.with_ymd_and_hms(2024, 3, 16, 12, 0, 0).unwrap();
    let window = DateWindow::new(2, now);

    let report = rollup::host_report(&runs, &window);

    assert_eq!(report.dates, vec![date(14), date(15), date(16)]);

    let hosts: Vec<&str> = report.heatmap.iter().map(|r| r.host.as_str()).collect();
    assert_eq!(hosts, vec!["build-agent-7", "ci-runner-01"]);

    let values = |i: usize| -> Vec<i32> { report.heatmap[i].cells.iter().map(|c| c.value).collect() };
    assert_eq!(values(0), vec![NO_DATA, NO_DATA, 33]);
    assert_eq!(values(1), vec![NO_DATA, 50, NO_DATA]);

    let ci = &report.summaries[1];
    assert_eq!(ci.host, "ci-runner-01");
    assert_eq!(ci.total_runs, 1);
    assert_eq!(ci.total_tests, 4);
    assert_eq!(ci.pass_rate, 50.0);
}

#[test]
fn test_suite_breakdown_merges_repeated_runs() {
    let rf6 = parse(RF6_OUTPUT);
    let rf7 = parse(RF7_OUTPUT);
    let suites = suite_groups(&[&rf6, &rf6, &rf7]);

    let breakdown = rollup::suite_breakdown(&suites);
    let names: Vec<&str> = breakdown.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Login", "Users", "API", "Nightly"]);

    let login = &breakdown[0];
    assert_eq!(login.run_count, 2);
    assert_eq!(login.total_tests, 4);
    assert_eq!(login.failed, 2);
    assert_eq!(login.pass_rate, 50.0);
    assert_eq!(login.avg_duration, Some(3_700));

    let top = rollup::top_suites(&suites, 3);
    let top_names: Vec<&str> = top.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(top_names, vec!["Login", "Users", "API"]);
}

#[test]
fn test_dashboard_overview_serializes_flat_totals() {
    let rf6 = parse(RF6_OUTPUT);
    let rf7 = parse(RF7_OUTPUT);
    let runs = vec![run_sample(&rf6), run_sample(&rf7)];
    let suites = suite_groups(&[&rf6, &rf7]);

    let sums = RunSums {
        runs: 2,
        total: 7,
        passed: 3,
        failed: 2,
        skipped: 2,
    };
    let overview = rollup::dashboard_overview(sums, Vec::<RunSummary>::new(), &runs, &suites);
    let json = serde_json::to_value(&overview).unwrap();

    assert_eq!(json["totalRuns"], 2);
    assert_eq!(json["totalTests"], 7);
    assert_eq!(json["avgPassRate"], 42.9);
    assert_eq!(json["recentRuns"].as_array().unwrap().len(), 0);
    assert_eq!(json["dailyTrend"][0]["date"], "2024-03-15");
    assert_eq!(json["dailyTrend"][1]["passRate"], 33.3);
    assert_eq!(json["suiteBreakdown"].as_array().unwrap().len(), 4);
}
