//! Robot Framework `output.xml` parsing.
//!
//! Accepts RF 6.x and RF 7.x output and produces one [`ParsedTestRun`]
//! holding the flattened leaf suites and their tests.

pub mod aggregate;
pub mod flatten;
pub mod normalize;
pub mod xml_tree;

use chrono::{DateTime, Utc};

use crate::models::ParsedTestRun;
use xml_tree::{ROBOT_ARRAY_TAGS, XmlError};

/// Substring every Robot Framework output document must contain.
pub const ROBOT_SIGNATURE: &str = "<robot";

/// Output.xml parse errors.
#[derive(Debug, thiserror::Error)]
pub enum RobotParseError {
    #[error("Invalid Robot Framework output.xml: {0}")]
    InvalidFormat(String),

    #[error("Malformed XML: {0}")]
    Malformed(#[from] XmlError),
}

/// Cheap signature check performed before a full parse.
pub fn looks_like_robot_output(xml: &str) -> bool {
    xml.contains(ROBOT_SIGNATURE)
}

/// Parse an output.xml document.
///
/// `now` is the fallback start time when the root suite status has none.
pub fn parse_output_xml(xml: &str, now: DateTime<Utc>) -> Result<ParsedTestRun, RobotParseError> {
    if !looks_like_robot_output(xml) {
        return Err(RobotParseError::InvalidFormat(
            "missing <robot> signature".to_string(),
        ));
    }

    let document = xml_tree::load(xml, ROBOT_ARRAY_TAGS)?;

    let robot = document.child("robot").ok_or_else(|| {
        RobotParseError::InvalidFormat("missing <robot> root element".to_string())
    })?;

    let root_suite = robot.child("suite").ok_or_else(|| {
        RobotParseError::InvalidFormat("missing root <suite> element".to_string())
    })?;

    let suites = flatten::flatten_suites(root_suite);
    let generator = robot.attr("generator").unwrap_or_default();
    let run = aggregate::aggregate_run(root_suite, generator, suites, now);

    tracing::debug!(
        name = %run.name,
        generator = %run.generator,
        suites = run.suites.len(),
        tests = run.total,
        "Parsed output.xml"
    );

    Ok(run)
}
