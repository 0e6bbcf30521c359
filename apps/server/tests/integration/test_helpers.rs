//! Shared helpers for integration tests.

use std::sync::{Arc, OnceLock};

use actix_web::{App, dev::ServiceResponse, test, web};
use chrono::{DateTime, TimeZone, Utc};
use robot_results_lib::api;
use robot_results_lib::config::{Config, DashboardConfig, UploadConfig};
use robot_results_lib::db::DbPool;
use tokio::sync::Semaphore;

/// RF 6 document: nested suites, legacy timestamps, `Host` metadata.
pub const RF6_OUTPUT: &str = include_str!("../fixtures/rf6_output.xml");

/// RF 7 document: root suite with its own test, ISO timestamps.
pub const RF7_OUTPUT: &str = include_str!("../fixtures/rf7_output.xml");

static MIGRATIONS_RUN: OnceLock<()> = OnceLock::new();

/// Fixed reference instant.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

/// Upload limits small enough to exercise the 413 path.
pub fn test_upload_config() -> UploadConfig {
    UploadConfig {
        max_upload_size: 64 * 1024,
        max_concurrent_uploads: 2,
        queue_timeout_secs: 5,
    }
}

/// Create a fresh DB pool. Migrations run only once.
pub async fn create_test_pool() -> DbPool {
    let mut config = Config::from_env().expect(
        "Failed to load config. Ensure RUST_ENV and DATABASE_URL are set, \
         and that PostgreSQL is running.",
    );
    config.database.max_connections = 2;
    config.database.min_connections = 1;

    let pool = DbPool::new(&config)
        .await
        .expect("Failed to connect to database");

    if MIGRATIONS_RUN.get().is_none() {
        pool.run_migrations()
            .await
            .expect("Failed to run migrations");
        let _ = MIGRATIONS_RUN.set(());
    }

    pool
}

/// Create the full API app on top of `pool`.
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let upload_config = test_upload_config();
    let semaphore = Arc::new(Semaphore::new(upload_config.max_concurrent_uploads));

    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(semaphore))
            .app_data(web::Data::new(upload_config))
            .app_data(web::Data::new(DashboardConfig::default()))
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_upload_routes)
                    .configure(api::configure_run_routes)
                    .configure(api::configure_dashboard_routes),
            ),
    )
    .await
}

/// Build a single-field multipart body.
pub fn multipart_body(boundary: &str, field: &str, file_name: &str, content: &str) -> String {
    format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/xml\r\n\
         \r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    )
}
