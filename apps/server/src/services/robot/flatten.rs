//! Suite tree flattening.
//!
//! Only suites that directly own tests become records. Container suites are
//! dropped and their descendants surface in pre-order.

use super::normalize::{extract_tags, normalize_child_status};
use super::xml_tree::XmlNode;
use crate::models::{ParsedTestCase, ParsedTestSuite};

/// Flatten `suite` and all of its descendants into leaf suite records.
pub fn flatten_suites(suite: &XmlNode) -> Vec<ParsedTestSuite> {
    let mut out = Vec::new();
    collect(suite, &mut out);
    out
}

fn collect(suite: &XmlNode, out: &mut Vec<ParsedTestSuite>) {
    let tests = suite.children("test");
    if !tests.is_empty() {
        out.push(ParsedTestSuite {
            name: suite.attr("name").unwrap_or_default().to_string(),
            source: suite.attr("source").map(str::to_string),
            duration: normalize_child_status(suite).duration_ms,
            tests: tests.iter().map(parse_test).collect(),
        });
    }

    for child in suite.children("suite") {
        collect(child, out);
    }
}

fn parse_test(test: &XmlNode) -> ParsedTestCase {
    let status = normalize_child_status(test);
    ParsedTestCase {
        name: test.attr("name").unwrap_or_default().to_string(),
        status: status.status,
        duration: status.duration_ms,
        message: status.message,
        tags: extract_tags(test),
    }
}
