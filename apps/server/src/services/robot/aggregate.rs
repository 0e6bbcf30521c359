//! Run-level totals, timing and host resolution.

use chrono::{DateTime, TimeDelta, Utc};

use super::normalize::normalize_child_status;
use super::xml_tree::XmlNode;
use crate::models::{ParsedTestRun, ParsedTestSuite, StatusCounts};

const HOST_META: &str = "host";

/// Build the run record from the root suite and its flattened leaves.
///
/// `now` is used as the start time when the root status carries no usable
/// timestamp.
pub fn aggregate_run(
    root_suite: &XmlNode,
    generator: &str,
    suites: Vec<ParsedTestSuite>,
    now: DateTime<Utc>,
) -> ParsedTestRun {
    let counts = count_tests(&suites);
    let status = normalize_child_status(root_suite);

    let started_at = status.started_at.unwrap_or_else(|| {
        tracing::debug!("Root suite has no usable start time, using current time");
        now
    });
    let ended_at = status.duration_ms.and_then(|ms| {
        let end = TimeDelta::try_milliseconds(ms).and_then(|d| started_at.checked_add_signed(d));
        if end.is_none() {
            tracing::debug!(duration_ms = ms, "Run end time out of range");
        }
        end
    });

    ParsedTestRun {
        name: root_suite.attr("name").unwrap_or_default().to_string(),
        generator: generator.to_string(),
        host: extract_host(root_suite),
        started_at,
        ended_at,
        duration: status.duration_ms,
        suites,
        total: counts.total,
        passed: counts.passed,
        failed: counts.failed,
        skipped: counts.skipped,
    }
}

/// Sum test statuses across every suite.
pub fn count_tests(suites: &[ParsedTestSuite]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for suite in suites {
        counts.merge(suite.counts());
    }
    counts
}

/// First direct `<meta name="host">` (any case) on the root suite with text.
pub fn extract_host(root_suite: &XmlNode) -> Option<String> {
    root_suite
        .children("meta")
        .iter()
        .find(|meta| {
            meta.attr("name")
                .is_some_and(|name| name.eq_ignore_ascii_case(HOST_META))
        })
        .and_then(XmlNode::text)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
