//! Audit repository (Postgres)

use crate::error::AppError;
use crate::models::audit::{AuditLog, AuditLogFilters};
use sqlx::PgPool;

pub struct AuditRepository {
    db: PgPool,
}

impl AuditRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn insert(&self, log: &AuditLog) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, actor_id, action, resource_type, resource_id, detail, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(log.id)
        .bind(log.actor_id)
        .bind(&log.action)
        .bind(&log.resource_type)
        .bind(log.resource_id)
        .bind(&log.detail)
        .bind(log.occurred_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn query(
        &self,
        filters: &AuditLogFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditLog>, AppError> {
        let mut query = String::from("SELECT * FROM audit_logs WHERE 1=1");
        let mut index = 0;

        if filters.actor_id.is_some() {
            index += 1;
            query.push_str(&format!(" AND actor_id = ${}", index));
        }
        if filters.action.is_some() {
            index += 1;
            query.push_str(&format!(" AND action = ${}", index));
        }
        if filters.resource_type.is_some() {
            index += 1;
            query.push_str(&format!(" AND resource_type = ${}", index));
        }

        query.push_str(&format!(
            " ORDER BY occurred_at DESC LIMIT ${} OFFSET ${}",
            index + 1,
            index + 2
        ));

        let mut q = sqlx::query_as::<_, AuditLog>(&query);

        if let Some(actor_id) = filters.actor_id {
            q = q.bind(actor_id);
        }
        if let Some(action) = &filters.action {
            q = q.bind(action.clone());
        }
        if let Some(resource_type) = &filters.resource_type {
            q = q.bind(resource_type.clone());
        }

        let logs = q.bind(limit).bind(offset).fetch_all(&self.db).await?;

        Ok(logs)
    }
}
