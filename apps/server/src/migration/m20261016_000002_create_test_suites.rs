//! Migration: Create test_suites table.
//!
//! Leaf suites of a run. Container suites are never stored.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE test_suites (
                    id UUID PRIMARY KEY,
                    test_run_id UUID NOT NULL REFERENCES test_runs(id) ON DELETE CASCADE,

                    name VARCHAR(500) NOT NULL,
                    source TEXT,                           -- Suite file or directory path
                    duration_ms BIGINT,

                    -- Counts computed from the suite's tests
                    total INTEGER NOT NULL DEFAULT 0,
                    passed INTEGER NOT NULL DEFAULT 0,
                    failed INTEGER NOT NULL DEFAULT 0,
                    skipped INTEGER NOT NULL DEFAULT 0,

                    sequence INTEGER NOT NULL DEFAULT 0
                );

                CREATE INDEX idx_test_suites_test_run_id ON test_suites(test_run_id, sequence);

                -- Index for the per-name suite breakdown
                CREATE INDEX idx_test_suites_name ON test_suites(name);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_suites CASCADE;")
            .await?;

        Ok(())
    }
}
