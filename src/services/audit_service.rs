//! Audit log service

use crate::error::AppError;
use crate::models::audit::{AuditLog, AuditLogFilters};
use crate::repository::AuditRepository;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// Audited action kinds
#[derive(Debug, Clone, Copy)]
pub enum AuditAction {
    EmployeeCreate,
    EmployeeUpdate,
    EmployeeDelete,
    PermissionAssign,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::EmployeeCreate => "employee.create",
            AuditAction::EmployeeUpdate => "employee.update",
            AuditAction::EmployeeDelete => "employee.delete",
            AuditAction::PermissionAssign => "permission.assign",
        }
    }
}

pub struct AuditService {
    db: PgPool,
}

impl AuditService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record one audited action
    pub async fn log_action(
        &self,
        actor_id: Uuid,
        action: AuditAction,
        resource_type: &str,
        resource_id: Option<Uuid>,
        detail: Option<&str>,
    ) -> Result<(), AppError> {
        let log = AuditLog {
            id: Uuid::new_v4(),
            actor_id,
            action: action.as_str().to_string(),
            resource_type: resource_type.to_string(),
            resource_id,
            detail: detail.map(|s| s.to_string()),
            occurred_at: Utc::now(),
        };

        AuditRepository::new(self.db.clone()).insert(&log).await
    }

    pub async fn list(
        &self,
        filters: &AuditLogFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditLog>, AppError> {
        AuditRepository::new(self.db.clone())
            .query(filters, limit, offset)
            .await
    }
}
