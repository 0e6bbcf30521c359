//! Host by day heatmap and per-host summaries.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};

use super::{DateWindow, RunSample, heatmap_value, pass_rate};
use crate::models::{HeatmapCell, HostHeatmapRow, HostReport, HostSummary};

/// Heatmap rows over `dates`, one per host in name order.
///
/// Runs without a host are ignored. Cells with no tests hold the no-data sentinel.
pub fn host_heatmap(runs: &[RunSample], dates: &[NaiveDate]) -> Vec<HostHeatmapRow> {
    let mut cells: BTreeMap<&str, HashMap<NaiveDate, (i64, i64)>> = BTreeMap::new();

    for run in runs {
        let Some(host) = run.host.as_deref() else {
            continue;
        };
        let cell = cells
            .entry(host)
            .or_default()
            .entry(run.date())
            .or_insert((0, 0));
        cell.0 += run.passed;
        cell.1 += run.total;
    }

    cells
        .into_iter()
        .map(|(host, by_date)| HostHeatmapRow {
            host: host.to_string(),
            cells: dates
                .iter()
                .map(|date| {
                    let (passed, total) = by_date.get(date).copied().unwrap_or((0, 0));
                    HeatmapCell {
                        date: *date,
                        value: heatmap_value(passed, total),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Window totals per host, in name order.
pub fn host_summaries(runs: &[RunSample]) -> Vec<HostSummary> {
    struct Acc {
        runs: i64,
        total: i64,
        passed: i64,
        failed: i64,
        last_run: DateTime<Utc>,
    }

    let mut hosts: BTreeMap<&str, Acc> = BTreeMap::new();

    for run in runs {
        let Some(host) = run.host.as_deref() else {
            continue;
        };
        let acc = hosts.entry(host).or_insert(Acc {
            runs: 0,
            total: 0,
            passed: 0,
            failed: 0,
            last_run: run.started_at,
        });
        acc.runs += 1;
        acc.total += run.total;
        acc.passed += run.passed;
        acc.failed += run.failed;
        acc.last_run = acc.last_run.max(run.started_at);
    }

    hosts
        .into_iter()
        .map(|(host, acc)| HostSummary {
            host: host.to_string(),
            total_runs: acc.runs,
            total_tests: acc.total,
            passed: acc.passed,
            failed: acc.failed,
            pass_rate: pass_rate(acc.passed, acc.total),
            last_run: acc.last_run,
        })
        .collect()
}

pub fn host_report(runs: &[RunSample], window: &DateWindow) -> HostReport {
    let dates = window.dates();
    HostReport {
        heatmap: host_heatmap(runs, &dates),
        summaries: host_summaries(runs),
        dates,
    }
}
