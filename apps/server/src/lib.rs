//! Robot Results Server library.
//!
//! Parses Robot Framework output.xml documents (RF6 and RF7 schemas), stores
//! the runs in PostgreSQL, and serves trend, suite and host rollups.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
