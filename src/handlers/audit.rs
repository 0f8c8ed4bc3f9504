//! Audit log HTTP handlers

use crate::{
    auth::middleware::AuthContext, error::AppError, middleware::AppState,
    models::audit::AuditLogFilters,
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub actor_id: Option<Uuid>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// List audit log entries
pub async fn list_audit_logs(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_screen_access(auth_context.user_id, "permissions")
        .await?;

    let filters = AuditLogFilters {
        actor_id: query.actor_id,
        action: query.action,
        resource_type: query.resource_type,
    };

    let logs = state
        .audit_service
        .list(&filters, query.limit.clamp(1, 200), query.offset.max(0))
        .await?;

    Ok(Json(json!({
        "audit_logs": logs,
        "count": logs.len()
    })))
}
