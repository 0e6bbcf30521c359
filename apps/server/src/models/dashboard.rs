//! Dashboard rollup DTOs.
//!
//! Recomputed per request and never persisted. Dates serialize as
//! `YYYY-MM-DD`, timestamps as ISO 8601.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::RunSummary;

/// One calendar day of the pass-rate trend.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrendPoint {
    pub date: NaiveDate,
    /// Percent with one decimal, 0 when the day had no tests.
    pub pass_rate: f64,
    pub total: i64,
    pub passed: i64,
    pub failed: i64,
    pub skipped: i64,
    pub run_count: i64,
}

/// Totals across the whole trend window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub total: i64,
    pub passed: i64,
    pub failed: i64,
    pub skipped: i64,
    pub runs: i64,
    pub pass_rate: f64,
}

/// Response body of `GET /dashboard/trends`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrendReport {
    pub trend: Vec<DailyTrendPoint>,
    pub summary: TrendSummary,
}

/// Per-suite rollup, merged by suite name.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuiteAnalysis {
    pub name: String,
    /// Number of suite occurrences merged into this row.
    pub run_count: i64,
    pub total_tests: i64,
    pub passed: i64,
    pub failed: i64,
    pub skipped: i64,
    pub pass_rate: f64,
    /// Mean duration in ms over occurrences that had one.
    pub avg_duration: Option<i64>,
}

/// Response body of `GET /dashboard/suites`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuiteBreakdown {
    pub suites: Vec<SuiteAnalysis>,
}

/// Dashboard suite slice, most frequent suites first.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TopSuite {
    pub name: String,
    pub passed: i64,
    pub failed: i64,
    pub skipped: i64,
}

/// Single heatmap cell: `y` is an integer percent, or -1 for no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct HeatmapCell {
    #[serde(rename = "x")]
    pub date: NaiveDate,
    #[serde(rename = "y")]
    pub value: i32,
}

/// One host's row across every date of the window.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HostHeatmapRow {
    #[serde(rename = "id")]
    pub host: String,
    #[serde(rename = "data")]
    pub cells: Vec<HeatmapCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HostSummary {
    pub host: String,
    pub total_runs: i64,
    pub total_tests: i64,
    pub passed: i64,
    pub failed: i64,
    pub pass_rate: f64,
    pub last_run: DateTime<Utc>,
}

/// Response body of `GET /dashboard/hosts`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HostReport {
    pub heatmap: Vec<HostHeatmapRow>,
    pub summaries: Vec<HostSummary>,
    pub dates: Vec<NaiveDate>,
}

/// Trend point as shown on the dashboard overview.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewTrendPoint {
    pub date: NaiveDate,
    pub pass_rate: f64,
    pub total: i64,
}

/// All-time totals shown on the dashboard overview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunTotals {
    pub total_runs: i64,
    pub total_tests: i64,
    pub total_passed: i64,
    pub total_failed: i64,
    pub total_skipped: i64,
    pub avg_pass_rate: f64,
}

/// Response body of `GET /dashboard`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    #[serde(flatten)]
    pub totals: RunTotals,
    pub recent_runs: Vec<RunSummary>,
    pub daily_trend: Vec<OverviewTrendPoint>,
    pub suite_breakdown: Vec<TopSuite>,
}
