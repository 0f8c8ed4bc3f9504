//! Permission query/mutation service
//!
//! Bridges the pure access evaluator to persisted state and owns the
//! two-phase assignment mutation: the account's level is updated first, then
//! the screen rows for that level are replaced. The second phase runs in its
//! own transaction; if it fails after the first phase succeeded, the caller
//! gets a distinct partial-update error so operators know to retry only the
//! screen assignment.

use crate::authz::AuthorizationContext;
use crate::error::AppError;
use crate::models::permission::{AccessAction, PermissionLevel, ScreenPermission, SCREEN_CATALOG};
use crate::repository::{EmployeeStore, ScreenPermissionStore};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

pub struct PermissionService {
    employees: Arc<dyn EmployeeStore>,
    screen_permissions: Arc<dyn ScreenPermissionStore>,
}

impl PermissionService {
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        screen_permissions: Arc<dyn ScreenPermissionStore>,
    ) -> Self {
        Self {
            employees,
            screen_permissions,
        }
    }

    /// Level currently assigned to the account; `None` when the account is
    /// unknown or has no level. Only transport failures are errors.
    pub async fn load_user_level(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PermissionLevel>, AppError> {
        self.employees.permission_level(user_id).await
    }

    /// All screen rows for a level; empty when the level has none, so callers
    /// can distinguish loaded-but-empty from not-yet-loaded.
    pub async fn load_screen_permissions(
        &self,
        level: PermissionLevel,
    ) -> Result<Vec<ScreenPermission>, AppError> {
        self.screen_permissions.list_by_level(level).await
    }

    /// Load the caller's level and screen rows into one evaluation context.
    /// Admin skips the row fetch; the bypass makes the rows irrelevant.
    pub async fn authorization_context(
        &self,
        user_id: Uuid,
    ) -> Result<AuthorizationContext, AppError> {
        match self.load_user_level(user_id).await? {
            None => Ok(AuthorizationContext::new(None, vec![])),
            Some(level) if level.is_admin() => {
                Ok(AuthorizationContext::new(Some(level), vec![]))
            }
            Some(level) => {
                let rows = self.load_screen_permissions(level).await?;
                Ok(AuthorizationContext::new(Some(level), rows))
            }
        }
    }

    /// Deny with `Forbidden` unless the caller may view the screen.
    pub async fn require_screen_access(
        &self,
        user_id: Uuid,
        screen_name: &str,
    ) -> Result<(), AppError> {
        let ctx = self.authorization_context(user_id).await?;
        if !ctx.can_access_screen(screen_name) {
            tracing::warn!(
                user_id = %user_id,
                screen = %screen_name,
                "Screen access denied"
            );
            return Err(AppError::Forbidden);
        }
        Ok(())
    }

    /// Deny with `Forbidden` unless the caller may perform the action.
    pub async fn require_action(
        &self,
        user_id: Uuid,
        screen_name: &str,
        action: AccessAction,
    ) -> Result<(), AppError> {
        let ctx = self.authorization_context(user_id).await?;
        if !ctx.can_perform_action(screen_name, action.as_str()) {
            tracing::warn!(
                user_id = %user_id,
                screen = %screen_name,
                action = %action.as_str(),
                "Action denied"
            );
            return Err(AppError::Forbidden);
        }
        Ok(())
    }

    /// Admin assignment flow: set the account's level, then replace the
    /// screen rows for that level with full-capability rows for `screens`.
    ///
    /// The level update is attempted strictly before the replacement; if the
    /// update fails the store is never touched. An empty `screens` list is a
    /// deliberate revoke-all: the level keeps zero rows and only the admin
    /// bypass still grants anything.
    pub async fn update_user_permission(
        &self,
        employee_id: Uuid,
        level: PermissionLevel,
        screens: &[String],
    ) -> Result<Vec<ScreenPermission>, AppError> {
        let screens = normalize_screens(screens)?;

        let updated = self.employees.set_permission_level(employee_id, level).await?;
        if !updated {
            return Err(AppError::not_found("employee"));
        }

        match self
            .screen_permissions
            .replace_for_level(level, &screens)
            .await
        {
            Ok(rows) => {
                tracing::info!(
                    employee_id = %employee_id,
                    permission_level = %level,
                    screens = rows.len(),
                    "User permission updated"
                );
                Ok(rows)
            }
            Err(e) => {
                // The level change already committed and cannot be rolled
                // back here; surface the half-applied state explicitly.
                tracing::error!(
                    employee_id = %employee_id,
                    permission_level = %level,
                    error = %e,
                    "Screen permission replacement failed after level update"
                );
                Err(AppError::PartialUpdate {
                    level: level.as_str().to_string(),
                    cause: e.to_string(),
                })
            }
        }
    }
}

/// Validate screen names against the catalog and drop duplicates, keeping
/// first-occurrence order. Duplicates would otherwise violate the
/// (permission_level, screen_name) uniqueness of the store.
fn normalize_screens(screens: &[String]) -> Result<Vec<String>, AppError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(screens.len());

    for screen in screens {
        let name = screen.trim();
        if name.is_empty() {
            return Err(AppError::validation("Screen name must not be empty"));
        }
        if !SCREEN_CATALOG.contains(&name) {
            return Err(AppError::Validation(format!("Unknown screen: {}", name)));
        }
        if seen.insert(name.to_string()) {
            out.push(name.to_string());
        }
    }

    Ok(out)
}
