//! Migration: Create test_runs table.
//!
//! One row per uploaded Robot Framework output.xml.

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
                CREATE TABLE test_runs (
                    id UUID PRIMARY KEY, -- UUIDv7 for time-ordered sorting

                    -- Run identification
                    name VARCHAR(500) NOT NULL,            -- Root suite name
                    source VARCHAR(500) NOT NULL,          -- Uploaded file name
                    generator VARCHAR(255) NOT NULL DEFAULT '',
                    host VARCHAR(255),                     -- From root suite "Host" metadata

                    -- Timing
                    started_at TIMESTAMPTZ NOT NULL,
                    ended_at TIMESTAMPTZ,
                    duration_ms BIGINT,

                    -- Aggregated counts
                    total INTEGER NOT NULL DEFAULT 0,
                    passed INTEGER NOT NULL DEFAULT 0,
                    failed INTEGER NOT NULL DEFAULT 0,
                    skipped INTEGER NOT NULL DEFAULT 0,

                    status VARCHAR(20) NOT NULL DEFAULT 'COMPLETED',
                    uploaded_by VARCHAR(255),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for window queries and recent runs
                CREATE INDEX idx_test_runs_started_at ON test_runs(started_at DESC);

                -- Index for the host heatmap
                CREATE INDEX idx_test_runs_host_started_at ON test_runs(host, started_at)
                    WHERE host IS NOT NULL;
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_runs CASCADE;")
            .await?;

        Ok(())
    }
}
