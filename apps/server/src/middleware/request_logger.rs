//! Request logging middleware.
//!
//! Logs one line when a request arrives and one when it completes, under the
//! `api` target so it can be filtered with `RUST_LOG=api=debug`.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{AsHeaderName, CONTENT_LENGTH, HeaderMap, USER_AGENT};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::UPLOADED_BY_HEADER;

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

fn header_or<'a>(headers: &'a HeaderMap, name: impl AsHeaderName, fallback: &'a str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(fallback)
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();

        {
            let headers = req.headers();
            let remote_addr = req
                .connection_info()
                .realip_remote_addr()
                .unwrap_or("unknown")
                .to_string();

            debug!(
                target: "api",
                method = %method,
                path = %path,
                query = %req.query_string(),
                remote_addr = %remote_addr,
                user_agent = %header_or(headers, USER_AGENT, "unknown"),
                content_length = %header_or(headers, CONTENT_LENGTH, "-"),
                uploaded_by = %header_or(headers, UPLOADED_BY_HEADER, "-"),
                "→ Request started"
            );
        }

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let duration_ms = start.elapsed().as_millis();
            let status = res.status();
            let status_code = status.as_u16();

            if status.is_server_error() {
                error!(
                    target: "api",
                    method = %method,
                    path = %path,
                    status = status_code,
                    duration_ms = %duration_ms,
                    "← Server error"
                );
            } else if status.is_client_error() {
                warn!(
                    target: "api",
                    method = %method,
                    path = %path,
                    status = status_code,
                    duration_ms = %duration_ms,
                    "← Client error"
                );
            } else {
                info!(
                    target: "api",
                    method = %method,
                    path = %path,
                    status = status_code,
                    duration_ms = %duration_ms,
                    "← Request completed"
                );
            }

            Ok(res)
        })
    }
}
