//! HTTP middleware and shared application state

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    auth::JwtService,
    config::AppConfig,
    error::AppError,
    repository::{EmployeeRepository, ScreenPermissionRepository},
    services::{AuditService, PermissionService},
};

/// Application state shared by all handlers.
///
/// Services are Arc-wrapped so request handlers share the same instances;
/// cloning the state is a pointer copy.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: sqlx::PgPool,
    pub permission_service: Arc<PermissionService>,
    pub audit_service: Arc<AuditService>,
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    /// Wire the services over the given pool
    pub fn build(config: AppConfig, db: sqlx::PgPool) -> Result<Self, AppError> {
        let jwt_service = Arc::new(JwtService::from_config(&config)?);

        let permission_service = Arc::new(PermissionService::new(
            Arc::new(EmployeeRepository::new(db.clone())),
            Arc::new(ScreenPermissionRepository::new(db.clone())),
        ));

        let audit_service = Arc::new(AuditService::new(db.clone()));

        Ok(Self {
            config,
            db,
            permission_service,
            audit_service,
            jwt_service,
        })
    }
}

/// Request tracking middleware
/// Assigns a trace_id and request_id to every request and records metrics
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        metrics::counter!("http_requests_total").increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis(),
            "Request completed"
        );

        if let Ok(value) = trace_id.parse() {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = request_id.parse() {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// Reuse an upstream trace id when present, otherwise mint one
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
