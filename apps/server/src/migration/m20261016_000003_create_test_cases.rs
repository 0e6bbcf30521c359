//! Migration: Create test_cases table.

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
                CREATE TABLE test_cases (
                    id UUID PRIMARY KEY,
                    test_suite_id UUID NOT NULL REFERENCES test_suites(id) ON DELETE CASCADE,
                    test_run_id UUID NOT NULL REFERENCES test_runs(id) ON DELETE CASCADE,

                    name VARCHAR(1000) NOT NULL,
                    status VARCHAR(10) NOT NULL CHECK (status IN ('PASS', 'FAIL', 'SKIP')),
                    duration_ms BIGINT,
                    message TEXT,                          -- Failure or skip reason

                    tags JSONB NOT NULL DEFAULT '[]'::jsonb,
                    metadata JSONB NOT NULL DEFAULT '{}'::jsonb,

                    sequence INTEGER NOT NULL DEFAULT 0
                );

                CREATE INDEX idx_test_cases_test_suite_id ON test_cases(test_suite_id, sequence);
                CREATE INDEX idx_test_cases_test_run_id ON test_cases(test_run_id);
                CREATE INDEX idx_test_cases_status ON test_cases(status);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_cases CASCADE;")
            .await?;

        Ok(())
    }
}
