//! Employee repository (Postgres)

use crate::error::AppError;
use crate::models::employee::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest};
use crate::models::permission::PermissionLevel;
use crate::repository::EmployeeStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

/// Raw row shape; the stored level string is validated on conversion.
#[derive(Debug, sqlx::FromRow)]
struct EmployeeRecord {
    id: Uuid,
    full_name: String,
    registration_number: Option<String>,
    role_title: Option<String>,
    email: Option<String>,
    active: bool,
    permissao_usuario: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EmployeeRecord> for Employee {
    fn from(record: EmployeeRecord) -> Self {
        // An unrecognized stored level is treated as no level at all: the
        // account keeps existing but every permission check denies.
        let permissao_usuario = record.permissao_usuario.as_deref().and_then(|value| {
            match PermissionLevel::from_str(value) {
                Ok(level) => Some(level),
                Err(_) => {
                    tracing::warn!(
                        employee_id = %record.id,
                        value = %value,
                        "Ignoring malformed stored permission level"
                    );
                    None
                }
            }
        });

        Employee {
            id: record.id,
            full_name: record.full_name,
            registration_number: record.registration_number,
            role_title: record.role_title,
            email: record.email,
            active: record.active,
            permissao_usuario,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

pub struct EmployeeRepository {
    db: PgPool,
}

impl EmployeeRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List employees, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Employee>, AppError> {
        let records = sqlx::query_as::<_, EmployeeRecord>(
            "SELECT * FROM funcionarios ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(records.into_iter().map(Employee::from).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let record =
            sqlx::query_as::<_, EmployeeRecord>("SELECT * FROM funcionarios WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?;

        Ok(record.map(Employee::from))
    }

    /// Create an employee; the account starts with no permission level.
    pub async fn create(&self, req: &CreateEmployeeRequest) -> Result<Employee, AppError> {
        let record = sqlx::query_as::<_, EmployeeRecord>(
            r#"
            INSERT INTO funcionarios (full_name, registration_number, role_title, email)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&req.full_name)
        .bind(&req.registration_number)
        .bind(&req.role_title)
        .bind(&req.email)
        .fetch_one(&self.db)
        .await?;

        Ok(Employee::from(record))
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateEmployeeRequest,
    ) -> Result<Option<Employee>, AppError> {
        let record = sqlx::query_as::<_, EmployeeRecord>(
            r#"
            UPDATE funcionarios
            SET
                full_name = COALESCE($2, full_name),
                role_title = COALESCE($3, role_title),
                email = COALESCE($4, email),
                active = COALESCE($5, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.full_name)
        .bind(&req.role_title)
        .bind(&req.email)
        .bind(req.active)
        .fetch_optional(&self.db)
        .await?;

        Ok(record.map(Employee::from))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM funcionarios WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl EmployeeStore for EmployeeRepository {
    async fn permission_level(
        &self,
        employee_id: Uuid,
    ) -> Result<Option<PermissionLevel>, AppError> {
        let row = sqlx::query("SELECT permissao_usuario FROM funcionarios WHERE id = $1")
            .bind(employee_id)
            .fetch_optional(&self.db)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stored: Option<String> = row.get("permissao_usuario");
        match stored.as_deref() {
            Some(value) => match PermissionLevel::from_str(value) {
                Ok(level) => Ok(Some(level)),
                Err(_) => {
                    tracing::warn!(
                        employee_id = %employee_id,
                        value = %value,
                        "Ignoring malformed stored permission level"
                    );
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn set_permission_level(
        &self,
        employee_id: Uuid,
        level: PermissionLevel,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE funcionarios SET permissao_usuario = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(employee_id)
        .bind(level.as_str())
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
