//! Permission administration HTTP handlers
//! Catalogs, per-level screen rows, and the assignment flow

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::permission::{AccessAction, AssignPermissionRequest, PermissionLevel, SCREEN_CATALOG},
    services::audit_service::AuditAction,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

// ==================== Catalogs ====================

/// List the assignable permission levels
pub async fn list_permission_levels(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_screen_access(auth_context.user_id, "permissions")
        .await?;

    let levels: Vec<&str> = PermissionLevel::ALL.iter().map(|l| l.as_str()).collect();

    Ok(Json(json!({
        "permission_levels": levels,
        "count": levels.len()
    })))
}

/// List the screens an admin can grant access to
pub async fn list_screens(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_screen_access(auth_context.user_id, "permissions")
        .await?;

    Ok(Json(json!({
        "screens": SCREEN_CATALOG,
        "count": SCREEN_CATALOG.len()
    })))
}

// ==================== Screen permission rows ====================

#[derive(Debug, Deserialize)]
pub struct LevelQuery {
    pub level: String,
}

/// List the screen permission rows of one level
pub async fn list_screen_permissions(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Query(query): Query<LevelQuery>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_screen_access(auth_context.user_id, "permissions")
        .await?;

    let level: PermissionLevel = query.level.parse()?;
    let rows = state.permission_service.load_screen_permissions(level).await?;

    Ok(Json(json!({
        "permission_level": level,
        "screen_permissions": rows,
        "count": rows.len()
    })))
}

// ==================== Caller context ====================

/// Level and screen rows of the calling user, for menu rendering and client
/// side guards. The evaluator is never called here; clients receive the data
/// and evaluate locally.
pub async fn get_my_permissions(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let ctx = state
        .permission_service
        .authorization_context(auth_context.user_id)
        .await?;

    Ok(Json(json!({
        "user_id": auth_context.user_id,
        "permission_level": ctx.level(),
        "is_admin": ctx.is_admin(),
        "screen_permissions": ctx.screens()
    })))
}

// ==================== Assignment flow ====================

/// Level and screen rows currently assigned to one employee
pub async fn get_employee_permissions(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_screen_access(auth_context.user_id, "permissions")
        .await?;

    let level = state.permission_service.load_user_level(id).await?;

    let rows = match level {
        Some(level) => state.permission_service.load_screen_permissions(level).await?,
        None => vec![],
    };

    Ok(Json(json!({
        "employee_id": id,
        "permission_level": level,
        "screen_permissions": rows
    })))
}

/// Assign a permission level and screen list to an employee
pub async fn assign_employee_permissions(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignPermissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_action(auth_context.user_id, "permissions", AccessAction::Edit)
        .await?;

    // Validate the level before any mutation is attempted
    let level: PermissionLevel = req.permission_level.parse()?;

    let rows = state
        .permission_service
        .update_user_permission(id, level, &req.screens)
        .await?;

    state
        .audit_service
        .log_action(
            auth_context.user_id,
            AuditAction::PermissionAssign,
            "employee",
            Some(id),
            Some(&format!(
                "Assigned level '{}' with {} screen(s)",
                level,
                rows.len()
            )),
        )
        .await?;

    Ok(Json(json!({
        "message": "Permissions updated",
        "employee_id": id,
        "permission_level": level,
        "screen_permissions": rows
    })))
}
