//! Daily pass-rate trend.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{RunSample, pass_rate};
use crate::models::{DailyTrendPoint, TrendReport, TrendSummary};

#[derive(Debug, Default, Clone, Copy)]
struct DayTotals {
    total: i64,
    passed: i64,
    failed: i64,
    skipped: i64,
    runs: i64,
}

/// Bucket runs by UTC start date, oldest day first.
pub fn daily_trend(runs: &[RunSample]) -> Vec<DailyTrendPoint> {
    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();

    for run in runs {
        let day = days.entry(run.date()).or_default();
        day.total += run.total;
        day.passed += run.passed;
        day.failed += run.failed;
        day.skipped += run.skipped;
        day.runs += 1;
    }

    days.into_iter()
        .map(|(date, d)| DailyTrendPoint {
            date,
            pass_rate: pass_rate(d.passed, d.total),
            total: d.total,
            passed: d.passed,
            failed: d.failed,
            skipped: d.skipped,
            run_count: d.runs,
        })
        .collect()
}

/// Totals across every run of the window.
pub fn trend_summary(runs: &[RunSample]) -> TrendSummary {
    let mut summary = runs.iter().fold(TrendSummary::default(), |mut acc, run| {
        acc.total += run.total;
        acc.passed += run.passed;
        acc.failed += run.failed;
        acc.skipped += run.skipped;
        acc.runs += 1;
        acc
    });
    summary.pass_rate = pass_rate(summary.passed, summary.total);
    summary
}

pub fn trend_report(runs: &[RunSample]) -> TrendReport {
    TrendReport {
        trend: daily_trend(runs),
        summary: trend_summary(runs),
    }
}
