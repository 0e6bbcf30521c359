//! Normalized Robot Framework run records produced by the output.xml parser.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Canonical test status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pass/fail/skip tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCounts {
    pub total: i32,
    pub passed: i32,
    pub failed: i32,
    pub skipped: i32,
}

impl StatusCounts {
    /// Count one test with the given status.
    pub fn record(&mut self, status: TestStatus) {
        self.total += 1;
        match status {
            TestStatus::Pass => self.passed += 1,
            TestStatus::Fail => self.failed += 1,
            TestStatus::Skip => self.skipped += 1,
        }
    }

    /// Add another tally to this one.
    pub fn merge(&mut self, other: StatusCounts) {
        self.total += other.total;
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

/// A single test case as parsed from output.xml.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTestCase {
    pub name: String,
    pub status: TestStatus,
    /// Duration in milliseconds.
    pub duration: Option<i64>,
    /// Failure or skip reason.
    pub message: Option<String>,
    /// Tags in document order; duplicates are kept.
    pub tags: Vec<String>,
}

/// A leaf suite: a suite that directly owns at least one test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTestSuite {
    pub name: String,
    /// Suite source path.
    pub source: Option<String>,
    /// Duration in milliseconds.
    pub duration: Option<i64>,
    pub tests: Vec<ParsedTestCase>,
}

impl ParsedTestSuite {
    /// Tally of this suite's tests by status.
    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for test in &self.tests {
            counts.record(test.status);
        }
        counts
    }
}

/// One normalized output.xml document.
///
/// `total == passed + failed + skipped` always holds, and each count equals
/// the number of tests across all suites carrying that status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTestRun {
    pub name: String,
    pub generator: String,
    /// Value of the root suite's `host` metadata entry.
    pub host: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Duration in milliseconds.
    pub duration: Option<i64>,
    pub suites: Vec<ParsedTestSuite>,
    pub total: i32,
    pub passed: i32,
    pub failed: i32,
    pub skipped: i32,
}

impl ParsedTestRun {
    /// Number of test cases across all suites.
    pub fn test_count(&self) -> usize {
        self.suites.iter().map(|s| s.tests.len()).sum()
    }
}
