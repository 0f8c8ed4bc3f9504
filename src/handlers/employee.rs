//! Employee registry HTTP handlers

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::employee::{CreateEmployeeRequest, UpdateEmployeeRequest},
    models::permission::AccessAction,
    repository::EmployeeRepository,
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
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// List employees
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_screen_access(auth_context.user_id, "employees")
        .await?;

    let repo = EmployeeRepository::new(state.db.clone());
    let employees = repo.list(query.limit.clamp(1, 200), query.offset.max(0)).await?;

    Ok(Json(json!({
        "employees": employees,
        "count": employees.len()
    })))
}

/// Fetch one employee
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_screen_access(auth_context.user_id, "employees")
        .await?;

    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("employee"))?;

    Ok(Json(json!({ "employee": employee })))
}

/// Create an employee; the account starts without a permission level
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_action(auth_context.user_id, "employees", AccessAction::Create)
        .await?;

    req.validate()?;

    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo.create(&req).await?;

    state
        .audit_service
        .log_action(
            auth_context.user_id,
            AuditAction::EmployeeCreate,
            "employee",
            Some(employee.id),
            Some(&format!("Created employee: {}", employee.full_name)),
        )
        .await?;

    Ok(Json(json!({
        "message": "Employee created",
        "employee": employee
    })))
}

/// Update an employee
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_action(auth_context.user_id, "employees", AccessAction::Edit)
        .await?;

    req.validate()?;

    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo
        .update(id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("employee"))?;

    state
        .audit_service
        .log_action(
            auth_context.user_id,
            AuditAction::EmployeeUpdate,
            "employee",
            Some(employee.id),
            Some(&format!("Updated employee: {}", employee.full_name)),
        )
        .await?;

    Ok(Json(json!({
        "message": "Employee updated",
        "employee": employee
    })))
}

/// Delete an employee
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_action(auth_context.user_id, "employees", AccessAction::Delete)
        .await?;

    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("employee"))?;

    let full_name = employee.full_name.clone();

    repo.delete(id).await?;

    state
        .audit_service
        .log_action(
            auth_context.user_id,
            AuditAction::EmployeeDelete,
            "employee",
            Some(id),
            Some(&format!("Deleted employee: {}", full_name)),
        )
        .await?;

    Ok(Json(json!({ "message": "Employee deleted" })))
}
