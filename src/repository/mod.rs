//! Database repository layer
//!
//! The permission service depends on the two store traits rather than on
//! concrete repositories, so mutation ordering can be tested with doubles.

use crate::error::AppError;
use crate::models::permission::{PermissionLevel, ScreenPermission};
use async_trait::async_trait;
use uuid::Uuid;

pub mod audit_repo;
pub mod employee_repo;
pub mod permission_repo;

pub use audit_repo::AuditRepository;
pub use employee_repo::EmployeeRepository;
pub use permission_repo::ScreenPermissionRepository;

/// User-account side of the permission model, owned by the employee record.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Level assigned to the account. `Ok(None)` covers both "employee not
    /// found" and "no level assigned" — the domain treats them identically.
    async fn permission_level(&self, employee_id: Uuid)
        -> Result<Option<PermissionLevel>, AppError>;

    /// Assign a level. Returns `false` when the employee does not exist.
    async fn set_permission_level(
        &self,
        employee_id: Uuid,
        level: PermissionLevel,
    ) -> Result<bool, AppError>;
}

/// Persisted collection of screen permission rows, keyed by level.
#[async_trait]
pub trait ScreenPermissionStore: Send + Sync {
    /// All rows for a level; empty when the level has none.
    async fn list_by_level(
        &self,
        level: PermissionLevel,
    ) -> Result<Vec<ScreenPermission>, AppError>;

    /// Delete every row for the level and insert one full-capability row per
    /// screen name, atomically. An empty slice revokes all rows.
    async fn replace_for_level(
        &self,
        level: PermissionLevel,
        screen_names: &[String],
    ) -> Result<Vec<ScreenPermission>, AppError>;
}
