//! Dashboard rollup endpoints.
//!
//! Windowed endpoints accept `days`, defaulting to the configured window.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::DashboardConfig;
use crate::db::DbPool;
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::models::{DashboardOverview, HostReport, RunSummary, SuiteBreakdown, TrendReport};
use crate::services::rollup::{self, DateWindow, RECENT_RUNS_LIMIT};

/// Look-back window query.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct WindowQuery {
    /// Number of days to look back from now.
    pub days: Option<u32>,
}

impl WindowQuery {
    /// Validated window size, falling back to the configured default.
    pub fn days_or_default(&self, config: &DashboardConfig) -> AppResult<u32> {
        match self.days {
            Some(days) if days > config.max_window_days => Err(AppError::InvalidInput(format!(
                "days must be between 0 and {}",
                config.max_window_days
            ))),
            Some(days) => Ok(days),
            None => Ok(config.default_window_days),
        }
    }

    /// Validated window when `days` was given, `None` otherwise.
    pub fn explicit_days(&self, config: &DashboardConfig) -> AppResult<Option<u32>> {
        match self.days {
            Some(_) => self.days_or_default(config).map(Some),
            None => Ok(None),
        }
    }
}

/// Dashboard overview.
///
/// All-time totals, the five latest runs, the windowed daily trend and the
/// ten most frequent suites.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    params(WindowQuery),
    responses(
        (status = 200, description = "Dashboard overview", body = DashboardOverview),
        (status = 400, description = "Invalid window", body = ErrorResponse)
    )
)]
pub async fn get_overview(
    query: web::Query<WindowQuery>,
    pool: web::Data<DbPool>,
    config: web::Data<DashboardConfig>,
) -> AppResult<HttpResponse> {
    let window = DateWindow::new(query.days_or_default(&config)?, Utc::now());

    let sums = pool.run_sums().await?;
    let recent = pool.recent_runs(RECENT_RUNS_LIMIT).await?;
    let window_runs = pool.runs_since(window.since).await?;
    let suites = pool.suite_groups(None).await?;

    let overview = rollup::dashboard_overview(
        sums,
        recent.into_iter().map(RunSummary::from).collect(),
        &window_runs,
        &suites,
    );

    Ok(HttpResponse::Ok().json(overview))
}

/// Daily pass-rate trend with window summary.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/trends",
    tag = "Dashboard",
    params(WindowQuery),
    responses(
        (status = 200, description = "Daily trend", body = TrendReport),
        (status = 400, description = "Invalid window", body = ErrorResponse)
    )
)]
pub async fn get_trends(
    query: web::Query<WindowQuery>,
    pool: web::Data<DbPool>,
    config: web::Data<DashboardConfig>,
) -> AppResult<HttpResponse> {
    let window = DateWindow::new(query.days_or_default(&config)?, Utc::now());
    let runs = pool.runs_since(window.since).await?;

    Ok(HttpResponse::Ok().json(rollup::trend_report(&runs)))
}

/// Per-suite breakdown, all-time unless `days` is given.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/suites",
    tag = "Dashboard",
    params(WindowQuery),
    responses(
        (status = 200, description = "Suite breakdown", body = SuiteBreakdown),
        (status = 400, description = "Invalid window", body = ErrorResponse)
    )
)]
pub async fn get_suites(
    query: web::Query<WindowQuery>,
    pool: web::Data<DbPool>,
    config: web::Data<DashboardConfig>,
) -> AppResult<HttpResponse> {
    let since = query
        .explicit_days(&config)?
        .map(|days| DateWindow::new(days, Utc::now()).since);
    let suites = pool.suite_groups(since).await?;

    Ok(HttpResponse::Ok().json(SuiteBreakdown {
        suites: rollup::suite_breakdown(&suites),
    }))
}

/// Host by day heatmap with per-host summaries.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/hosts",
    tag = "Dashboard",
    params(WindowQuery),
    responses(
        (status = 200, description = "Host heatmap", body = HostReport),
        (status = 400, description = "Invalid window", body = ErrorResponse)
    )
)]
pub async fn get_hosts(
    query: web::Query<WindowQuery>,
    pool: web::Data<DbPool>,
    config: web::Data<DashboardConfig>,
) -> AppResult<HttpResponse> {
    let window = DateWindow::new(query.days_or_default(&config)?, Utc::now());
    let runs = pool.host_runs_since(window.since).await?;

    Ok(HttpResponse::Ok().json(rollup::host_report(&runs, &window)))
}

/// Configure dashboard routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/dashboard").route(web::get().to(get_overview)))
        .service(web::resource("/dashboard/trends").route(web::get().to(get_trends)))
        .service(web::resource("/dashboard/suites").route(web::get().to(get_suites)))
        .service(web::resource("/dashboard/hosts").route(web::get().to(get_hosts)));
}
