//! Status node normalization across Robot Framework schema generations.
//!
//! RF 7 writes `start` (ISO 8601) and `elapsed` (seconds) attributes and puts
//! failure messages in the element text. RF 6 writes `starttime`/`endtime` in
//! the `YYYYMMDD HH:MM:SS.mmm` layout and may carry a `message` attribute.
//! Both shapes resolve to one [`NormalizedStatus`].

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use regex::Regex;

use super::xml_tree::XmlNode;
use crate::models::TestStatus;

static LEGACY_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})(\d{2})(\d{2})\s+(\d{2}):(\d{2}):(\d{2})\.(\d{3})")
        .expect("legacy timestamp pattern is valid")
});

const NOT_AVAILABLE: &str = "N/A";

/// Raw attribute view of a `<status>` element.
///
/// Kept independent of the XML tree so the resolution rules can be exercised
/// with hand-built values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RawStatus<'a> {
    pub status: Option<&'a str>,
    pub start: Option<&'a str>,
    pub starttime: Option<&'a str>,
    pub endtime: Option<&'a str>,
    pub elapsed: Option<&'a str>,
    pub message: Option<&'a str>,
    pub text: Option<&'a str>,
}

impl<'a> RawStatus<'a> {
    pub fn from_node(node: &'a XmlNode) -> Self {
        Self {
            status: node.attr("status"),
            start: node.attr("start"),
            starttime: node.attr("starttime"),
            endtime: node.attr("endtime"),
            elapsed: node.attr("elapsed"),
            message: node.attr("message"),
            text: node.text(),
        }
    }
}

/// Canonical status values shared by RF 6 and RF 7 output.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedStatus {
    pub status: TestStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub message: Option<String>,
}

impl Default for NormalizedStatus {
    fn default() -> Self {
        Self {
            status: TestStatus::Skip,
            started_at: None,
            duration_ms: None,
            message: None,
        }
    }
}

/// Resolve a raw status into its canonical form. Never fails.
pub fn normalize(raw: &RawStatus<'_>) -> NormalizedStatus {
    NormalizedStatus {
        status: status_value(raw.status),
        started_at: started_at(raw),
        duration_ms: duration_ms(raw),
        message: message(raw),
    }
}

/// Normalize the `<status>` child of `owner`; a missing node yields defaults.
pub fn normalize_child_status(owner: &XmlNode) -> NormalizedStatus {
    match owner.child("status") {
        Some(node) => normalize(&RawStatus::from_node(node)),
        None => {
            tracing::debug!(element = owner.name(), "No status element, using defaults");
            NormalizedStatus::default()
        }
    }
}

/// `PASS` and `FAIL` (any case) map through; everything else is `SKIP`.
pub fn status_value(value: Option<&str>) -> TestStatus {
    let Some(value) = value else {
        return TestStatus::Skip;
    };

    if value.eq_ignore_ascii_case("PASS") {
        TestStatus::Pass
    } else if value.eq_ignore_ascii_case("FAIL") {
        TestStatus::Fail
    } else {
        if !value.eq_ignore_ascii_case("SKIP") {
            tracing::debug!(status = value, "Unrecognized status, treating as SKIP");
        }
        TestStatus::Skip
    }
}

/// Elapsed seconds first, then the legacy start/end pair.
pub fn duration_ms(raw: &RawStatus<'_>) -> Option<i64> {
    if let Some(elapsed) = raw.elapsed.filter(|v| !v.is_empty()) {
        match elapsed.trim().parse::<f64>().ok().and_then(elapsed_to_ms) {
            Some(ms) => return Some(ms),
            None => tracing::debug!(elapsed, "Unparseable elapsed attribute"),
        }
    }

    let start = raw.starttime.and_then(parse_legacy_timestamp)?;
    let end = raw.endtime.and_then(parse_legacy_timestamp)?;
    Some((end - start).num_milliseconds())
}

/// Seconds to whole milliseconds, `None` when the result is not a valid duration.
fn elapsed_to_ms(seconds: f64) -> Option<i64> {
    let ms = (seconds * 1000.0).round();
    if !ms.is_finite() || ms.abs() >= i64::MAX as f64 {
        return None;
    }
    TimeDelta::try_milliseconds(ms as i64).map(|d| d.num_milliseconds())
}

/// ISO `start` first, then the legacy `starttime`.
pub fn started_at(raw: &RawStatus<'_>) -> Option<DateTime<Utc>> {
    if let Some(start) = raw.start.filter(|v| !v.is_empty()) {
        match parse_iso_timestamp(start) {
            Some(ts) => return Some(ts),
            None => tracing::debug!(start, "Unparseable start attribute"),
        }
    }

    raw.starttime.and_then(parse_legacy_timestamp)
}

/// Element text first, then the legacy `message` attribute.
pub fn message(raw: &RawStatus<'_>) -> Option<String> {
    raw.text
        .filter(|t| !t.is_empty())
        .or_else(|| raw.message.filter(|m| !m.is_empty()))
        .map(str::to_string)
}

/// Tag values of a `<test>`: direct `<tag>` children, else `<tags><tag>`.
pub fn extract_tags(test: &XmlNode) -> Vec<String> {
    let direct = test.children("tag");
    let tags = if !direct.is_empty() {
        direct
    } else {
        test.child("tags").map(|w| w.children("tag")).unwrap_or(&[])
    };

    tags.iter()
        .map(|tag| tag.text().unwrap_or_default().to_string())
        .collect()
}

/// Parse an RF 7 timestamp. Values without an offset are taken as UTC.
pub fn parse_iso_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse the RF 6 `YYYYMMDD HH:MM:SS.mmm` layout as UTC.
///
/// `N/A` and values with out-of-range components yield `None`.
pub fn parse_legacy_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() || value == NOT_AVAILABLE {
        return None;
    }

    let caps = LEGACY_TIMESTAMP.captures(value)?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = i32::try_from(num(1)?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(2)?, num(3)?);
    let ts = date.and_then(|d| d.and_hms_milli_opt(num(4)?, num(5)?, num(6)?, num(7)?));

    if ts.is_none() {
        tracing::debug!(value, "Legacy timestamp has invalid components");
    }
    ts.map(|naive| naive.and_utc())
}
