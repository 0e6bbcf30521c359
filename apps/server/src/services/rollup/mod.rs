//! Dashboard rollups over stored runs.
//!
//! Every function here is pure: storage rows are first mapped to
//! [`RunSample`] / [`SuiteGroup`] and the caller passes the current instant
//! explicitly through [`DateWindow`].

pub mod hosts;
pub mod overview;
pub mod suites;
pub mod trend;

use chrono::{DateTime, Duration, NaiveDate, Utc};

pub use hosts::{host_heatmap, host_report, host_summaries};
pub use overview::dashboard_overview;
pub use suites::{suite_breakdown, top_suites};
pub use trend::{daily_trend, trend_report, trend_summary};

/// Heatmap value for a host and day without any observed tests.
pub const NO_DATA: i32 = -1;

/// Number of suites on the dashboard overview.
pub const TOP_SUITES_LIMIT: usize = 10;

/// Number of runs on the dashboard overview.
pub const RECENT_RUNS_LIMIT: u64 = 5;

/// Run counts relevant to rollups.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSample {
    pub host: Option<String>,
    pub started_at: DateTime<Utc>,
    pub total: i64,
    pub passed: i64,
    pub failed: i64,
    pub skipped: i64,
}

impl RunSample {
    /// UTC calendar day of the run start.
    pub fn date(&self) -> NaiveDate {
        self.started_at.date_naive()
    }
}

/// Sums over every stored suite sharing one name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteGroup {
    pub name: String,
    /// Stored suites with this name.
    pub occurrences: i64,
    pub total: i64,
    pub passed: i64,
    pub failed: i64,
    pub skipped: i64,
    pub duration_sum: i64,
    /// Occurrences with a known duration.
    pub timed_occurrences: i64,
}

impl SuiteGroup {
    /// Mean duration over timed occurrences, rounded to whole milliseconds.
    pub fn avg_duration(&self) -> Option<i64> {
        if self.timed_occurrences <= 0 {
            return None;
        }
        Some((self.duration_sum as f64 / self.timed_occurrences as f64).round() as i64)
    }
}

/// Percent with one decimal, rounded half away from zero. Zero when `total` is zero.
pub fn pass_rate(passed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (passed as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Integer percent for a heatmap cell, or [`NO_DATA`] when `total` is zero.
pub fn heatmap_value(passed: i64, total: i64) -> i32 {
    if total <= 0 {
        return NO_DATA;
    }
    (passed as f64 / total as f64 * 100.0).round() as i32
}

/// A look-back window of whole days ending at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// Lower bound for the storage filter.
    pub since: DateTime<Utc>,
    pub since_date: NaiveDate,
    pub today: NaiveDate,
}

impl DateWindow {
    pub fn new(days: u32, now: DateTime<Utc>) -> Self {
        let since = now - Duration::days(i64::from(days));
        Self {
            since,
            since_date: since.date_naive(),
            today: now.date_naive(),
        }
    }

    /// Every calendar day from `since_date` through `today`, inclusive.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.since_date
            .iter_days()
            .take_while(|d| *d <= self.today)
            .collect()
    }
}
