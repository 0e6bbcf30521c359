//! Stored run endpoints.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::models::{Pagination, PaginationParams, RunDetail, RunListResponse, RunSummary};

/// List stored runs, most recently started first.
#[utoipa::path(
    get,
    path = "/api/v1/runs",
    tag = "Runs",
    params(
        ("page" = Option<u32>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u32>, Query, description = "Items per page (default and max: 100)")
    ),
    responses(
        (status = 200, description = "Run list", body = RunListResponse)
    )
)]
pub async fn list_runs(
    query: web::Query<PaginationParams>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let page = query.page();
    let limit = query.clamped_limit();

    let (runs, total) = pool
        .list_runs(u64::from(query.offset()), u64::from(limit))
        .await?;

    Ok(HttpResponse::Ok().json(RunListResponse {
        runs: runs.into_iter().map(RunSummary::from).collect(),
        pagination: Pagination::new(page, limit, total),
    }))
}

/// Get one run with its suites and tests.
#[utoipa::path(
    get,
    path = "/api/v1/runs/{run_id}",
    tag = "Runs",
    params(
        ("run_id" = String, Path, description = "Run UUID")
    ),
    responses(
        (status = 200, description = "Run detail", body = RunDetail),
        (status = 400, description = "Malformed run ID", body = ErrorResponse),
        (status = 404, description = "Run not found", body = ErrorResponse)
    )
)]
pub async fn get_run(path: web::Path<String>, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let raw_id = path.into_inner();
    let run_id = Uuid::parse_str(&raw_id)?;

    let detail = pool
        .get_run_detail(run_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Run {}", run_id)))?;

    Ok(HttpResponse::Ok().json(detail))
}

/// Configure run routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/runs").route(web::get().to(list_runs)))
        .service(web::resource("/runs/{run_id}").route(web::get().to(get_run)));
}
