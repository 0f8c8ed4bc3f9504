//! Permission service tests
//!
//! Runs the service over in-memory store doubles so the assignment flow can
//! be verified without a database: mutation ordering, partial-update
//! reporting, revoke-all and the authorization context loading rules.

use async_trait::async_trait;
use chrono::Utc;
use paveops_service::error::AppError;
use paveops_service::models::permission::{AccessAction, PermissionLevel, ScreenPermission};
use paveops_service::repository::{EmployeeStore, ScreenPermissionStore};
use paveops_service::services::PermissionService;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Shared log of store calls, in invocation order
type CallLog = Arc<Mutex<Vec<String>>>;

struct FakeEmployeeStore {
    levels: Mutex<HashMap<Uuid, Option<PermissionLevel>>>,
    fail_set_level: bool,
    calls: CallLog,
}

impl FakeEmployeeStore {
    fn new(calls: CallLog) -> Self {
        Self {
            levels: Mutex::new(HashMap::new()),
            fail_set_level: false,
            calls,
        }
    }

    fn with_level(self, id: Uuid, level: Option<PermissionLevel>) -> Self {
        self.levels.lock().unwrap().insert(id, level);
        self
    }

    fn failing(mut self) -> Self {
        self.fail_set_level = true;
        self
    }
}

#[async_trait]
impl EmployeeStore for FakeEmployeeStore {
    async fn permission_level(
        &self,
        employee_id: Uuid,
    ) -> Result<Option<PermissionLevel>, AppError> {
        self.calls.lock().unwrap().push("permission_level".to_string());
        Ok(self
            .levels
            .lock()
            .unwrap()
            .get(&employee_id)
            .copied()
            .flatten())
    }

    async fn set_permission_level(
        &self,
        employee_id: Uuid,
        level: PermissionLevel,
    ) -> Result<bool, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push("set_permission_level".to_string());
        if self.fail_set_level {
            return Err(AppError::internal_error("database connection lost"));
        }
        let mut levels = self.levels.lock().unwrap();
        if levels.contains_key(&employee_id) {
            levels.insert(employee_id, Some(level));
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

struct FakeScreenPermissionStore {
    rows: Mutex<Vec<ScreenPermission>>,
    fail_replace: bool,
    calls: CallLog,
}

impl FakeScreenPermissionStore {
    fn new(calls: CallLog) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_replace: false,
            calls,
        }
    }

    fn with_rows(self, rows: Vec<ScreenPermission>) -> Self {
        *self.rows.lock().unwrap() = rows;
        self
    }

    fn failing(mut self) -> Self {
        self.fail_replace = true;
        self
    }
}

#[async_trait]
impl ScreenPermissionStore for FakeScreenPermissionStore {
    async fn list_by_level(
        &self,
        level: PermissionLevel,
    ) -> Result<Vec<ScreenPermission>, AppError> {
        self.calls.lock().unwrap().push("list_by_level".to_string());
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.permission_level == level)
            .cloned()
            .collect())
    }

    async fn replace_for_level(
        &self,
        level: PermissionLevel,
        screen_names: &[String],
    ) -> Result<Vec<ScreenPermission>, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push("replace_for_level".to_string());
        if self.fail_replace {
            return Err(AppError::internal_error("insert failed"));
        }

        let mut rows = self.rows.lock().unwrap();
        rows.retain(|row| row.permission_level != level);

        let inserted: Vec<ScreenPermission> = screen_names
            .iter()
            .map(|screen| ScreenPermission {
                id: Uuid::new_v4(),
                permission_level: level,
                screen_name: screen.clone(),
                can_access: true,
                can_create: true,
                can_edit: true,
                can_delete: true,
                created_at: Utc::now(),
            })
            .collect();
        rows.extend(inserted.iter().cloned());

        Ok(inserted)
    }
}

fn full_row(level: PermissionLevel, screen: &str) -> ScreenPermission {
    ScreenPermission {
        id: Uuid::new_v4(),
        permission_level: level,
        screen_name: screen.to_string(),
        can_access: true,
        can_create: true,
        can_edit: true,
        can_delete: true,
        created_at: Utc::now(),
    }
}

fn service(
    employees: FakeEmployeeStore,
    screens: FakeScreenPermissionStore,
) -> PermissionService {
    PermissionService::new(Arc::new(employees), Arc::new(screens))
}

#[tokio::test]
async fn test_assignment_replaces_with_full_capability_rows() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let employee_id = Uuid::new_v4();

    let svc = service(
        FakeEmployeeStore::new(calls.clone()).with_level(employee_id, None),
        FakeScreenPermissionStore::new(calls.clone())
            .with_rows(vec![full_row(PermissionLevel::Rh, "reports")]),
    );

    let screens = vec!["employees".to_string(), "dashboard".to_string()];
    let rows = svc
        .update_user_permission(employee_id, PermissionLevel::Rh, &screens)
        .await
        .unwrap();

    // The old row set is gone; only the submitted screens remain, all flags on
    assert_eq!(rows.len(), 2);
    let names: Vec<&str> = rows.iter().map(|r| r.screen_name.as_str()).collect();
    assert_eq!(names, vec!["employees", "dashboard"]);
    for row in &rows {
        assert_eq!(row.permission_level, PermissionLevel::Rh);
        assert!(row.can_access && row.can_create && row.can_edit && row.can_delete);
    }

    let stored = svc
        .load_screen_permissions(PermissionLevel::Rh)
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
    assert!(!stored.iter().any(|r| r.screen_name == "reports"));
}

#[tokio::test]
async fn test_level_update_runs_before_replacement() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let employee_id = Uuid::new_v4();

    let svc = service(
        FakeEmployeeStore::new(calls.clone()).with_level(employee_id, None),
        FakeScreenPermissionStore::new(calls.clone()),
    );

    svc.update_user_permission(employee_id, PermissionLevel::Transporte, &[])
        .await
        .unwrap();

    let recorded = calls.lock().unwrap().clone();
    assert_eq!(
        recorded,
        vec!["set_permission_level".to_string(), "replace_for_level".to_string()]
    );
}

#[tokio::test]
async fn test_failed_level_update_never_touches_store() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let employee_id = Uuid::new_v4();

    let svc = service(
        FakeEmployeeStore::new(calls.clone())
            .with_level(employee_id, None)
            .failing(),
        FakeScreenPermissionStore::new(calls.clone()),
    );

    let screens = vec!["dashboard".to_string()];
    let result = svc
        .update_user_permission(employee_id, PermissionLevel::Rh, &screens)
        .await;

    assert!(result.is_err());
    // The first phase failed, so the replacement must never have been invoked
    let recorded = calls.lock().unwrap().clone();
    assert_eq!(recorded, vec!["set_permission_level".to_string()]);
    // A first-phase failure is not a partial update
    assert!(!matches!(result, Err(AppError::PartialUpdate { .. })));
}

#[tokio::test]
async fn test_replacement_failure_reports_partial_update() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let employee_id = Uuid::new_v4();

    let svc = service(
        FakeEmployeeStore::new(calls.clone()).with_level(employee_id, None),
        FakeScreenPermissionStore::new(calls.clone()).failing(),
    );

    let screens = vec!["dashboard".to_string()];
    let result = svc
        .update_user_permission(employee_id, PermissionLevel::Encarregado, &screens)
        .await;

    match result {
        Err(AppError::PartialUpdate { level, .. }) => {
            assert_eq!(level, "encarregado");
        }
        other => panic!("Expected PartialUpdate, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_employee_is_not_found() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));

    let svc = service(
        FakeEmployeeStore::new(calls.clone()),
        FakeScreenPermissionStore::new(calls.clone()),
    );

    let result = svc
        .update_user_permission(Uuid::new_v4(), PermissionLevel::Rh, &[])
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_unknown_screen_rejected_before_any_mutation() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let employee_id = Uuid::new_v4();

    let svc = service(
        FakeEmployeeStore::new(calls.clone()).with_level(employee_id, None),
        FakeScreenPermissionStore::new(calls.clone()),
    );

    let screens = vec!["payroll".to_string()];
    let result = svc
        .update_user_permission(employee_id, PermissionLevel::Rh, &screens)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_screen_list_revokes_all() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let employee_id = Uuid::new_v4();

    let svc = service(
        FakeEmployeeStore::new(calls.clone())
            .with_level(employee_id, Some(PermissionLevel::Operador)),
        FakeScreenPermissionStore::new(calls.clone()).with_rows(vec![
            full_row(PermissionLevel::Operador, "dashboard"),
            full_row(PermissionLevel::Operador, "checklist"),
        ]),
    );

    let rows = svc
        .update_user_permission(employee_id, PermissionLevel::Operador, &[])
        .await
        .unwrap();
    assert!(rows.is_empty());

    let stored = svc
        .load_screen_permissions(PermissionLevel::Operador)
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_assignment_end_to_end_grants_only_submitted_screens() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let employee_id = Uuid::new_v4();

    // Fresh account: no level assigned yet
    let svc = service(
        FakeEmployeeStore::new(calls.clone()).with_level(employee_id, None),
        FakeScreenPermissionStore::new(calls.clone()),
    );

    let ctx = svc.authorization_context(employee_id).await.unwrap();
    assert!(!ctx.can_access_screen("dashboard"));

    let screens = vec!["dashboard".to_string(), "checklist".to_string()];
    svc.update_user_permission(employee_id, PermissionLevel::Encarregado, &screens)
        .await
        .unwrap();

    let ctx = svc.authorization_context(employee_id).await.unwrap();
    assert_eq!(ctx.level(), Some(PermissionLevel::Encarregado));
    assert!(ctx.can_access_screen("dashboard"));
    assert!(ctx.can_access_screen("checklist"));
    assert!(ctx.can_perform_action("checklist", "edit"));
    assert!(!ctx.can_access_screen("permissions"));
    assert!(!ctx.can_perform_action("permissions", "edit"));
}

#[tokio::test]
async fn test_admin_context_skips_row_fetch() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let employee_id = Uuid::new_v4();

    let svc = service(
        FakeEmployeeStore::new(calls.clone())
            .with_level(employee_id, Some(PermissionLevel::Admin)),
        FakeScreenPermissionStore::new(calls.clone()),
    );

    let ctx = svc.authorization_context(employee_id).await.unwrap();
    assert!(ctx.is_admin());
    assert!(ctx.can_perform_action("permissions", "delete"));

    let recorded = calls.lock().unwrap().clone();
    assert!(!recorded.contains(&"list_by_level".to_string()));
}

#[tokio::test]
async fn test_require_screen_access_denies_with_forbidden() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let employee_id = Uuid::new_v4();

    let svc = service(
        FakeEmployeeStore::new(calls.clone())
            .with_level(employee_id, Some(PermissionLevel::Motorista)),
        FakeScreenPermissionStore::new(calls.clone())
            .with_rows(vec![full_row(PermissionLevel::Motorista, "checklist")]),
    );

    assert!(svc
        .require_screen_access(employee_id, "checklist")
        .await
        .is_ok());
    assert!(matches!(
        svc.require_screen_access(employee_id, "permissions").await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        svc.require_action(employee_id, "permissions", AccessAction::Edit)
            .await,
        Err(AppError::Forbidden)
    ));
}

#[tokio::test]
async fn test_duplicate_screens_inserted_once() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let employee_id = Uuid::new_v4();

    let svc = service(
        FakeEmployeeStore::new(calls.clone()).with_level(employee_id, None),
        FakeScreenPermissionStore::new(calls.clone()),
    );

    let screens = vec![
        "dashboard".to_string(),
        "reports".to_string(),
        "dashboard".to_string(),
    ];
    let rows = svc
        .update_user_permission(employee_id, PermissionLevel::Engenheiro, &screens)
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    let names: Vec<&str> = rows.iter().map(|r| r.screen_name.as_str()).collect();
    assert_eq!(names, vec!["dashboard", "reports"]);
}
