//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Robot Results Server",
        version = "0.1.0",
        description = "API server for ingesting Robot Framework output.xml files and serving run dashboards"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Upload
        api::upload::upload_output,
        // Runs
        api::runs::list_runs,
        api::runs::get_run,
        // Dashboard
        api::dashboard::get_overview,
        api::dashboard::get_trends,
        api::dashboard::get_suites,
        api::dashboard::get_hosts,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::Pagination,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Runs
            models::TestStatus,
            models::StatusCounts,
            models::UploadResponse,
            models::RunSummary,
            models::RunListResponse,
            models::RunDetail,
            models::SuiteDetail,
            models::TestCaseDetail,
            // Dashboard
            models::RunTotals,
            models::OverviewTrendPoint,
            models::TopSuite,
            models::DashboardOverview,
            models::DailyTrendPoint,
            models::TrendSummary,
            models::TrendReport,
            models::SuiteAnalysis,
            models::SuiteBreakdown,
            models::HeatmapCell,
            models::HostHeatmapRow,
            models::HostSummary,
            models::HostReport,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Upload", description = "Robot Framework output.xml ingestion"),
        (name = "Runs", description = "Stored runs with suites and tests"),
        (name = "Dashboard", description = "Trend, suite and host rollups")
    )
)]
pub struct ApiDoc;
