//! Output.xml upload endpoint.

use std::sync::Arc;
use std::time::Duration;

use actix_multipart::Multipart;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use utoipa::IntoParams;

use crate::config::{UPLOADED_BY_HEADER, UploadConfig};
use crate::db::{DbPool, NewRunUpload};
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::models::UploadResponse;
use crate::services::upload::{self, UploadedDocument};

/// Query parameters for raw uploads.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UploadQuery {
    /// File name recorded for a raw body upload (default: output.xml).
    pub name: Option<String>,
}

/// Upload a Robot Framework output.xml.
///
/// Accepts `multipart/form-data` with a `file` field, or the XML document as
/// the raw request body. The run, its suites and tests are stored atomically.
#[utoipa::path(
    post,
    path = "/api/v1/upload",
    tag = "Upload",
    params(UploadQuery),
    request_body(content = String, content_type = "application/xml", description = "output.xml document"),
    responses(
        (status = 200, description = "Run stored", body = UploadResponse),
        (status = 400, description = "Not a Robot Framework output.xml", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
        (status = 503, description = "Too many concurrent uploads", body = ErrorResponse)
    )
)]
pub async fn upload_output(
    req: HttpRequest,
    payload: web::Payload,
    query: web::Query<UploadQuery>,
    pool: web::Data<DbPool>,
    upload_semaphore: web::Data<Arc<Semaphore>>,
    upload_config: web::Data<UploadConfig>,
) -> AppResult<HttpResponse> {
    // Acquire an upload permit before buffering the body
    let _permit = tokio::time::timeout(
        Duration::from_secs(upload_config.queue_timeout_secs),
        upload_semaphore.acquire(),
    )
    .await
    .map_err(|_| {
        warn!("Upload rejected: too many concurrent uploads");
        AppError::ServiceUnavailable(
            "Too many concurrent uploads. Please try again later.".to_string(),
        )
    })?
    .map_err(|_| AppError::ServiceUnavailable("Upload queue closed".to_string()))?;

    let max_size = upload_config.max_upload_size;
    let document = if is_multipart(&req) {
        upload::read_multipart(Multipart::new(req.headers(), payload), max_size).await?
    } else {
        upload::read_raw(payload, query.name.as_deref(), max_size).await?
    };

    let uploaded_by = req
        .headers()
        .get(UPLOADED_BY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let UploadedDocument { file_name, bytes } = document;
    let now = Utc::now();
    let run = web::block(move || upload::parse_document(&bytes, now))
        .await
        .map_err(|e| AppError::Internal(format!("Parser task failed: {}", e)))??;

    let stored = pool
        .insert_parsed_run(
            &run,
            NewRunUpload {
                source: file_name,
                uploaded_by,
            },
        )
        .await
        .map_err(|e| match e {
            AppError::Database(msg) => AppError::Internal(msg),
            other => other,
        })?;

    info!(
        run_id = %stored.id,
        name = %stored.name,
        source = %stored.source,
        suites = run.suites.len(),
        total = stored.total,
        passed = stored.passed,
        failed = stored.failed,
        skipped = stored.skipped,
        "Stored Robot Framework run"
    );

    Ok(HttpResponse::Ok().json(UploadResponse {
        id: stored.id,
        name: stored.name,
        total: stored.total,
        passed: stored.passed,
        failed: stored.failed,
        skipped: stored.skipped,
        status: stored.status,
        suites_count: run.suites.len(),
    }))
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
}

/// Configure upload routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/upload").route(web::post().to(upload_output)));
}
