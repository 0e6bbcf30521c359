//! Database queries for test runs, their suites and test cases.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseBackend, DatabaseTransaction, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
    TransactionTrait,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::entity::test_case::{self, ActiveModel as TestCaseActiveModel, Entity as TestCase};
use crate::entity::test_run::{self, ActiveModel as TestRunActiveModel, Entity as TestRun};
use crate::entity::test_suite::{self, ActiveModel as TestSuiteActiveModel, Entity as TestSuite};
use crate::error::{AppError, AppResult};
use crate::models::{ParsedTestRun, RUN_STATUS_COMPLETED, RunDetail, SuiteDetail};
use crate::services::rollup::overview::RunSums;
use crate::services::rollup::{RunSample, SuiteGroup};

use super::DbPool;

/// Rows per multi-row insert, well below the PostgreSQL bind parameter limit.
const INSERT_CHUNK_SIZE: usize = 1000;

/// Upload provenance stored alongside a parsed run.
#[derive(Debug, Clone)]
pub struct NewRunUpload {
    /// Uploaded file name.
    pub source: String,
    pub uploaded_by: Option<String>,
}

impl From<&test_run::Model> for RunSample {
    fn from(run: &test_run::Model) -> Self {
        Self {
            host: run.host.clone(),
            started_at: run.started_at,
            total: i64::from(run.total),
            passed: i64::from(run.passed),
            failed: i64::from(run.failed),
            skipped: i64::from(run.skipped),
        }
    }
}

impl DbPool {
    /// Store a parsed run with all of its suites and tests in one transaction.
    ///
    /// Nothing is visible to readers unless every row was written.
    pub async fn insert_parsed_run(
        &self,
        run: &ParsedTestRun,
        upload: NewRunUpload,
    ) -> AppResult<test_run::Model> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let run_id = Uuid::now_v7();

        let model = TestRunActiveModel {
            id: Set(run_id),
            name: Set(run.name.clone()),
            source: Set(upload.source),
            generator: Set(run.generator.clone()),
            host: Set(run.host.clone()),
            started_at: Set(run.started_at),
            ended_at: Set(run.ended_at),
            duration_ms: Set(run.duration),
            total: Set(run.total),
            passed: Set(run.passed),
            failed: Set(run.failed),
            skipped: Set(run.skipped),
            status: Set(RUN_STATUS_COMPLETED.to_string()),
            uploaded_by: Set(upload.uploaded_by),
            created_at: Set(Utc::now()),
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test run: {}", e)))?;

        let mut suites = Vec::with_capacity(run.suites.len());
        let mut cases = Vec::with_capacity(run.test_count());

        for (suite_seq, suite) in run.suites.iter().enumerate() {
            let suite_id = Uuid::now_v7();
            let counts = suite.counts();

            suites.push(TestSuiteActiveModel {
                id: Set(suite_id),
                test_run_id: Set(run_id),
                name: Set(suite.name.clone()),
                source: Set(suite.source.clone()),
                duration_ms: Set(suite.duration),
                total: Set(counts.total),
                passed: Set(counts.passed),
                failed: Set(counts.failed),
                skipped: Set(counts.skipped),
                sequence: Set(suite_seq as i32),
            });

            for (case_seq, case) in suite.tests.iter().enumerate() {
                cases.push(TestCaseActiveModel {
                    id: Set(Uuid::now_v7()),
                    test_suite_id: Set(suite_id),
                    test_run_id: Set(run_id),
                    name: Set(case.name.clone()),
                    status: Set(case.status.as_str().to_string()),
                    duration_ms: Set(case.duration),
                    message: Set(case.message.clone()),
                    tags: Set(JsonValue::from(case.tags.clone())),
                    metadata: Set(JsonValue::Object(Default::default())),
                    sequence: Set(case_seq as i32),
                });
            }
        }

        insert_suites(&txn, suites).await?;
        insert_cases(&txn, cases).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit test run: {}", e)))?;

        Ok(inserted)
    }

    /// List runs, most recently started first.
    pub async fn list_runs(&self, offset: u64, limit: u64) -> AppResult<(Vec<test_run::Model>, u64)> {
        let select = TestRun::find();

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test runs: {}", e)))?;

        let runs = select
            .order_by_desc(test_run::Column::StartedAt)
            .offset(offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test runs: {}", e)))?;

        Ok((runs, total))
    }

    /// The `limit` most recently started runs.
    pub async fn recent_runs(&self, limit: u64) -> AppResult<Vec<test_run::Model>> {
        let (runs, _) = self.list_runs(0, limit).await?;
        Ok(runs)
    }

    /// Get a run by ID.
    pub async fn get_run_by_id(&self, id: Uuid) -> AppResult<Option<test_run::Model>> {
        let result = TestRun::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test run: {}", e)))?;

        Ok(result)
    }

    /// Get a run with its suites and tests in stored order.
    pub async fn get_run_detail(&self, id: Uuid) -> AppResult<Option<RunDetail>> {
        let Some(run) = self.get_run_by_id(id).await? else {
            return Ok(None);
        };

        let suites = TestSuite::find()
            .filter(test_suite::Column::TestRunId.eq(id))
            .order_by_asc(test_suite::Column::Sequence)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test suites: {}", e)))?;

        let cases = TestCase::find()
            .filter(test_case::Column::TestRunId.eq(id))
            .order_by_asc(test_case::Column::Sequence)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test cases: {}", e)))?;

        let mut by_suite: HashMap<Uuid, Vec<test_case::Model>> = HashMap::new();
        for case in cases {
            by_suite.entry(case.test_suite_id).or_default().push(case);
        }

        let suites = suites
            .into_iter()
            .map(|suite| {
                let cases = by_suite.remove(&suite.id).unwrap_or_default();
                SuiteDetail::new(suite, cases)
            })
            .collect();

        Ok(Some(RunDetail::new(run, suites)))
    }

    /// Runs started at or after `since`, oldest first.
    pub async fn runs_since(&self, since: DateTime<Utc>) -> AppResult<Vec<RunSample>> {
        let runs = TestRun::find()
            .filter(test_run::Column::StartedAt.gte(since))
            .order_by_asc(test_run::Column::StartedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get runs in window: {}", e)))?;

        Ok(runs.iter().map(RunSample::from).collect())
    }

    /// Runs with a host started at or after `since`, oldest first.
    pub async fn host_runs_since(&self, since: DateTime<Utc>) -> AppResult<Vec<RunSample>> {
        let runs = TestRun::find()
            .filter(test_run::Column::StartedAt.gte(since))
            .filter(test_run::Column::Host.is_not_null())
            .order_by_asc(test_run::Column::StartedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get host runs: {}", e)))?;

        Ok(runs.iter().map(RunSample::from).collect())
    }

    /// Stored suites grouped by name, optionally limited to runs started since an instant.
    pub async fn suite_groups(&self, since: Option<DateTime<Utc>>) -> AppResult<Vec<SuiteGroup>> {
        #[derive(Debug, FromQueryResult)]
        struct SuiteGroupRow {
            name: String,
            occurrences: i64,
            total: i64,
            passed: i64,
            failed: i64,
            skipped: i64,
            duration_sum: i64,
            timed_occurrences: i64,
        }

        const COLUMNS: &str = "SELECT ts.name AS name, \
             COUNT(*)::BIGINT AS occurrences, \
             COALESCE(SUM(ts.total), 0)::BIGINT AS total, \
             COALESCE(SUM(ts.passed), 0)::BIGINT AS passed, \
             COALESCE(SUM(ts.failed), 0)::BIGINT AS failed, \
             COALESCE(SUM(ts.skipped), 0)::BIGINT AS skipped, \
             COALESCE(SUM(ts.duration_ms), 0)::BIGINT AS duration_sum, \
             COUNT(ts.duration_ms)::BIGINT AS timed_occurrences \
             FROM test_suites ts";

        let statement = match since {
            Some(since) => Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                format!(
                    "{COLUMNS} INNER JOIN test_runs r ON r.id = ts.test_run_id \
                     WHERE r.started_at >= $1 GROUP BY ts.name ORDER BY ts.name"
                ),
                [since.into()],
            ),
            None => Statement::from_string(
                DatabaseBackend::Postgres,
                format!("{COLUMNS} GROUP BY ts.name ORDER BY ts.name"),
            ),
        };

        let rows = SuiteGroupRow::find_by_statement(statement)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to group test suites: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|r| SuiteGroup {
                name: r.name,
                occurrences: r.occurrences,
                total: r.total,
                passed: r.passed,
                failed: r.failed,
                skipped: r.skipped,
                duration_sum: r.duration_sum,
                timed_occurrences: r.timed_occurrences,
            })
            .collect())
    }

    /// All-time run count and test sums.
    pub async fn run_sums(&self) -> AppResult<RunSums> {
        #[derive(Debug, FromQueryResult)]
        struct SumsRow {
            runs: i64,
            total: i64,
            passed: i64,
            failed: i64,
            skipped: i64,
        }

        let row = SumsRow::find_by_statement(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT COUNT(*)::BIGINT AS runs, \
             COALESCE(SUM(total), 0)::BIGINT AS total, \
             COALESCE(SUM(passed), 0)::BIGINT AS passed, \
             COALESCE(SUM(failed), 0)::BIGINT AS failed, \
             COALESCE(SUM(skipped), 0)::BIGINT AS skipped \
             FROM test_runs",
        ))
        .one(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to sum test runs: {}", e)))?;

        Ok(row
            .map(|r| RunSums {
                runs: r.runs,
                total: r.total,
                passed: r.passed,
                failed: r.failed,
                skipped: r.skipped,
            })
            .unwrap_or_default())
    }
}

async fn insert_suites(txn: &DatabaseTransaction, suites: Vec<TestSuiteActiveModel>) -> AppResult<()> {
    for chunk in suites.chunks(INSERT_CHUNK_SIZE) {
        TestSuite::insert_many(chunk.to_vec())
            .exec(txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test suites: {}", e)))?;
    }
    Ok(())
}

async fn insert_cases(txn: &DatabaseTransaction, cases: Vec<TestCaseActiveModel>) -> AppResult<()> {
    for chunk in cases.chunks(INSERT_CHUNK_SIZE) {
        TestCase::insert_many(chunk.to_vec())
            .exec(txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test cases: {}", e)))?;
    }
    Ok(())
}
