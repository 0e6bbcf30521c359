//! Robot results integration suite.
//!
//! Parser and rollup tests run standalone. HTTP tests that touch storage
//! require a running PostgreSQL database and are ignored by default.
//!
//! Run with: cargo test --test integration
//! Include database tests: RUST_ENV=development cargo test --test integration -- --include-ignored

mod test_helpers;

mod api_tests;
mod parser_tests;
mod rollup_tests;
