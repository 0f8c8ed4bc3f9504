//! Screen permission store (Postgres)

use crate::error::AppError;
use crate::models::permission::{PermissionLevel, ScreenPermission};
use crate::repository::ScreenPermissionStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

/// Raw row shape as stored; the level is validated on the way out so the
/// evaluator only ever sees well-formed rows.
#[derive(Debug, sqlx::FromRow)]
struct ScreenPermissionRecord {
    id: Uuid,
    permission_level: String,
    screen_name: String,
    can_access: bool,
    can_create: bool,
    can_edit: bool,
    can_delete: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ScreenPermissionRecord> for ScreenPermission {
    type Error = AppError;

    fn try_from(record: ScreenPermissionRecord) -> Result<Self, Self::Error> {
        let permission_level = PermissionLevel::from_str(&record.permission_level)?;
        Ok(ScreenPermission {
            id: record.id,
            permission_level,
            screen_name: record.screen_name,
            can_access: record.can_access,
            can_create: record.can_create,
            can_edit: record.can_edit,
            can_delete: record.can_delete,
            created_at: record.created_at,
        })
    }
}

pub struct ScreenPermissionRepository {
    db: PgPool,
}

impl ScreenPermissionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Convert fetched records, dropping malformed rows instead of letting
    /// them reach evaluation. A dropped row denies, never grants.
    fn convert_rows(records: Vec<ScreenPermissionRecord>) -> Vec<ScreenPermission> {
        records
            .into_iter()
            .filter_map(|record| match ScreenPermission::try_from(record) {
                Ok(row) => Some(row),
                Err(e) => {
                    tracing::warn!("Dropping malformed screen permission row: {}", e);
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl ScreenPermissionStore for ScreenPermissionRepository {
    async fn list_by_level(
        &self,
        level: PermissionLevel,
    ) -> Result<Vec<ScreenPermission>, AppError> {
        let records = sqlx::query_as::<_, ScreenPermissionRecord>(
            "SELECT * FROM screen_permissions WHERE permission_level = $1 ORDER BY screen_name",
        )
        .bind(level.as_str())
        .fetch_all(&self.db)
        .await?;

        Ok(Self::convert_rows(records))
    }

    async fn replace_for_level(
        &self,
        level: PermissionLevel,
        screen_names: &[String],
    ) -> Result<Vec<ScreenPermission>, AppError> {
        // Delete and reinsert in one transaction so no reader ever observes
        // the level with a partially replaced row set.
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM screen_permissions WHERE permission_level = $1")
            .bind(level.as_str())
            .execute(&mut *tx)
            .await?;

        let mut inserted = Vec::with_capacity(screen_names.len());
        for screen_name in screen_names {
            let record = sqlx::query_as::<_, ScreenPermissionRecord>(
                r#"
                INSERT INTO screen_permissions (
                    permission_level, screen_name, can_access, can_create, can_edit, can_delete
                )
                VALUES ($1, $2, TRUE, TRUE, TRUE, TRUE)
                RETURNING *
                "#,
            )
            .bind(level.as_str())
            .bind(screen_name)
            .fetch_one(&mut *tx)
            .await?;

            inserted.push(ScreenPermission::try_from(record)?);
        }

        tx.commit().await?;

        tracing::info!(
            permission_level = %level,
            screens = inserted.len(),
            "Screen permissions replaced"
        );

        Ok(inserted)
    }
}
