//! Dashboard landing page rollup.

use super::{RunSample, SuiteGroup, TOP_SUITES_LIMIT, daily_trend, pass_rate, top_suites};
use crate::models::{DashboardOverview, OverviewTrendPoint, RunSummary, RunTotals};

/// All-time run and test sums, as read from storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSums {
    pub runs: i64,
    pub total: i64,
    pub passed: i64,
    pub failed: i64,
    pub skipped: i64,
}

impl From<RunSums> for RunTotals {
    fn from(sums: RunSums) -> Self {
        Self {
            total_runs: sums.runs,
            total_tests: sums.total,
            total_passed: sums.passed,
            total_failed: sums.failed,
            total_skipped: sums.skipped,
            avg_pass_rate: pass_rate(sums.passed, sums.total),
        }
    }
}

/// Assemble the overview from all-time sums, the latest runs, the windowed
/// runs and the all-time suite groups.
pub fn dashboard_overview(
    sums: RunSums,
    recent_runs: Vec<RunSummary>,
    window_runs: &[RunSample],
    suites: &[SuiteGroup],
) -> DashboardOverview {
    let daily_trend = daily_trend(window_runs)
        .into_iter()
        .map(|point| OverviewTrendPoint {
            date: point.date,
            pass_rate: point.pass_rate,
            total: point.total,
        })
        .collect();

    DashboardOverview {
        totals: sums.into(),
        recent_runs,
        daily_trend,
        suite_breakdown: top_suites(suites, TOP_SUITES_LIMIT),
    }
}
