//! Access evaluator tests
//!
//! Exercises the pure decision functions against the deny-by-default rules:
//! admin bypass, missing data, unmapped screens and unknown actions.

use chrono::Utc;
use paveops_service::authz::{can_access_screen, can_perform_action, AuthorizationContext};
use paveops_service::models::permission::{PermissionLevel, ScreenPermission};
use uuid::Uuid;

fn row(level: PermissionLevel, screen: &str, caps: [bool; 4]) -> ScreenPermission {
    ScreenPermission {
        id: Uuid::new_v4(),
        permission_level: level,
        screen_name: screen.to_string(),
        can_access: caps[0],
        can_create: caps[1],
        can_edit: caps[2],
        can_delete: caps[3],
        created_at: Utc::now(),
    }
}

#[test]
fn test_admin_granted_without_rows() {
    // Admin never consults the store, not even when the rows are absent
    assert!(can_access_screen("dashboard", Some(PermissionLevel::Admin), None));
    assert!(can_access_screen("permissions", Some(PermissionLevel::Admin), Some(&[])));
    assert!(can_perform_action(
        "permissions",
        "delete",
        Some(PermissionLevel::Admin),
        None
    ));
}

#[test]
fn test_admin_granted_for_unknown_action() {
    // The bypass applies before the action name is even parsed
    assert!(can_perform_action(
        "employees",
        "archive",
        Some(PermissionLevel::Admin),
        None
    ));
    assert!(can_perform_action("employees", "", Some(PermissionLevel::Admin), None));
}

#[test]
fn test_no_level_denies_everything() {
    let rows = vec![row(PermissionLevel::Rh, "employees", [true, true, true, true])];
    assert!(!can_access_screen("employees", None, Some(&rows)));
    assert!(!can_perform_action("employees", "create", None, Some(&rows)));
}

#[test]
fn test_unloaded_rows_deny_non_admin() {
    // None means the store was never loaded; every non-admin check fails
    assert!(!can_access_screen("dashboard", Some(PermissionLevel::Rh), None));
    assert!(!can_perform_action(
        "dashboard",
        "edit",
        Some(PermissionLevel::Rh),
        None
    ));
}

#[test]
fn test_unmapped_screen_denied() {
    let rows = vec![row(PermissionLevel::Rh, "employees", [true, true, true, true])];
    assert!(!can_access_screen("fleets", Some(PermissionLevel::Rh), Some(&rows)));
    assert!(!can_perform_action(
        "fleets",
        "create",
        Some(PermissionLevel::Rh),
        Some(&rows)
    ));
}

#[test]
fn test_capability_flags_checked_per_action() {
    let rows = vec![row(
        PermissionLevel::Rh,
        "employees",
        [true, false, true, false],
    )];
    let level = Some(PermissionLevel::Rh);

    assert!(can_access_screen("employees", level, Some(&rows)));
    assert!(!can_perform_action("employees", "create", level, Some(&rows)));
    assert!(can_perform_action("employees", "edit", level, Some(&rows)));
    assert!(!can_perform_action("employees", "delete", level, Some(&rows)));
}

#[test]
fn test_row_without_access_flag_denies_view() {
    // A row can exist and still withhold the view capability
    let rows = vec![row(
        PermissionLevel::Balanca,
        "reports",
        [false, false, false, false],
    )];
    assert!(!can_access_screen(
        "reports",
        Some(PermissionLevel::Balanca),
        Some(&rows)
    ));
}

#[test]
fn test_unknown_action_denied_for_non_admin() {
    let rows = vec![row(PermissionLevel::Rh, "employees", [true, true, true, true])];
    assert!(!can_perform_action(
        "employees",
        "archive",
        Some(PermissionLevel::Rh),
        Some(&rows)
    ));
    assert!(!can_perform_action(
        "employees",
        "Create",
        Some(PermissionLevel::Rh),
        Some(&rows)
    ));
}

#[test]
fn test_rows_scoped_by_screen_name_only() {
    // Lookup matches the exact screen name; similar names stay separate
    let rows = vec![
        row(PermissionLevel::Logistica, "mass-requests", [true, true, false, false]),
        row(
            PermissionLevel::Logistica,
            "mass-programming",
            [true, false, false, false],
        ),
    ];
    let level = Some(PermissionLevel::Logistica);

    assert!(can_perform_action("mass-requests", "create", level, Some(&rows)));
    assert!(!can_perform_action(
        "mass-programming",
        "create",
        level,
        Some(&rows)
    ));
}

#[test]
fn test_denied_context_is_inert() {
    let ctx = AuthorizationContext::denied();
    assert!(ctx.level().is_none());
    assert!(!ctx.is_admin());
    assert!(!ctx.can_access_screen("dashboard"));
    assert!(!ctx.can_perform_action("dashboard", "create"));
}

#[test]
fn test_context_with_empty_rows_denies_non_admin() {
    // Loaded-but-empty still denies; only admin survives an empty store
    let ctx = AuthorizationContext::new(Some(PermissionLevel::Encarregado), vec![]);
    assert!(!ctx.can_access_screen("checklist"));

    let admin = AuthorizationContext::new(Some(PermissionLevel::Admin), vec![]);
    assert!(admin.can_access_screen("checklist"));
}
