//! Business logic services.

pub mod robot;
pub mod rollup;
pub mod upload;

pub use robot::{RobotParseError, parse_output_xml};
