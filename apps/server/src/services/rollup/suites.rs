//! Per-suite rollups.
//!
//! Suites are merged by name in storage, so same-named suites from different
//! runs or files arrive here as one [`SuiteGroup`].

use super::{SuiteGroup, pass_rate};
use crate::models::{SuiteAnalysis, TopSuite};

/// Suite analysis ordered by total test count, largest first, then by name.
pub fn suite_breakdown(groups: &[SuiteGroup]) -> Vec<SuiteAnalysis> {
    let mut rows: Vec<SuiteAnalysis> = groups
        .iter()
        .map(|g| SuiteAnalysis {
            name: g.name.clone(),
            run_count: g.occurrences,
            total_tests: g.total,
            passed: g.passed,
            failed: g.failed,
            skipped: g.skipped,
            pass_rate: pass_rate(g.passed, g.total),
            avg_duration: g.avg_duration(),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_tests
            .cmp(&a.total_tests)
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

/// The `limit` most frequent suite names with their status sums.
pub fn top_suites(groups: &[SuiteGroup], limit: usize) -> Vec<TopSuite> {
    let mut ranked: Vec<&SuiteGroup> = groups.iter().collect();
    ranked.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then_with(|| a.name.cmp(&b.name))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|g| TopSuite {
            name: g.name.clone(),
            passed: g.passed,
            failed: g.failed,
            skipped: g.skipped,
        })
        .collect()
}
