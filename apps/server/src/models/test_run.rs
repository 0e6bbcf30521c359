//! Stored run DTOs returned by the runs and upload endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{test_case, test_run, test_suite};

/// Status written for every successfully ingested run.
pub const RUN_STATUS_COMPLETED: &str = "COMPLETED";

/// Response body of `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: Uuid,
    pub name: String,
    pub total: i32,
    pub passed: i32,
    pub failed: i32,
    pub skipped: i32,
    pub status: String,
    pub suites_count: usize,
}

/// Run row as listed by `GET /runs` and the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub id: Uuid,
    pub name: String,
    pub source: String,
    pub host: Option<String>,
    pub started_at: DateTime<Utc>,
    /// Duration in milliseconds.
    pub duration: Option<i64>,
    pub total: i32,
    pub passed: i32,
    pub failed: i32,
    pub skipped: i32,
    pub status: String,
    pub uploaded_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<test_run::Model> for RunSummary {
    fn from(run: test_run::Model) -> Self {
        Self {
            id: run.id,
            name: run.name,
            source: run.source,
            host: run.host,
            started_at: run.started_at,
            duration: run.duration_ms,
            total: run.total,
            passed: run.passed,
            failed: run.failed,
            skipped: run.skipped,
            status: run.status,
            uploaded_by: run.uploaded_by,
            created_at: run.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseDetail {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub duration: Option<i64>,
    pub message: Option<String>,
    pub tags: Vec<String>,
    #[schema(value_type = Object)]
    pub metadata: JsonValue,
}

impl From<test_case::Model> for TestCaseDetail {
    fn from(case: test_case::Model) -> Self {
        let tags = serde_json::from_value(case.tags).unwrap_or_default();
        Self {
            id: case.id,
            name: case.name,
            status: case.status,
            duration: case.duration_ms,
            message: case.message,
            tags,
            metadata: case.metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuiteDetail {
    pub id: Uuid,
    pub name: String,
    pub source: Option<String>,
    pub duration: Option<i64>,
    pub total: i32,
    pub passed: i32,
    pub failed: i32,
    pub skipped: i32,
    pub tests: Vec<TestCaseDetail>,
}

impl SuiteDetail {
    pub fn new(suite: test_suite::Model, cases: Vec<test_case::Model>) -> Self {
        Self {
            id: suite.id,
            name: suite.name,
            source: suite.source,
            duration: suite.duration_ms,
            total: suite.total,
            passed: suite.passed,
            failed: suite.failed,
            skipped: suite.skipped,
            tests: cases.into_iter().map(TestCaseDetail::from).collect(),
        }
    }
}

/// Response body of `GET /runs/{id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunDetail {
    #[serde(flatten)]
    pub run: RunSummary,
    pub generator: String,
    pub ended_at: Option<DateTime<Utc>>,
    pub suites: Vec<SuiteDetail>,
}

impl RunDetail {
    pub fn new(run: test_run::Model, suites: Vec<SuiteDetail>) -> Self {
        let generator = run.generator.clone();
        let ended_at = run.ended_at;
        Self {
            run: run.into(),
            generator,
            ended_at,
            suites,
        }
    }
}
