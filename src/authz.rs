//! Access evaluation
//!
//! Pure, synchronous decision functions over already-loaded permission data.
//! Nothing here performs I/O; callers supply the user's level and the screen
//! rows for that level. Every missing or ambiguous input resolves to denied:
//! a default of `true` anywhere in this module would be a privilege
//! escalation, a default of `false` is at worst an availability nuisance.

use crate::models::permission::{AccessAction, PermissionLevel, ScreenPermission};

/// Whether the given level may view a screen at all.
///
/// `admin` is granted unconditionally, independent of `rows`. `rows == None`
/// means the store was never loaded and denies everything; a screen with no
/// row is inaccessible, not implicitly open.
pub fn can_access_screen(
    screen_name: &str,
    level: Option<PermissionLevel>,
    rows: Option<&[ScreenPermission]>,
) -> bool {
    match level {
        Some(level) if level.is_admin() => true,
        Some(_) => rows.is_some_and(|rows| {
            rows.iter()
                .find(|row| row.screen_name == screen_name)
                .is_some_and(|row| row.can_access)
        }),
        None => false,
    }
}

/// Whether the given level may perform a mutating action on a screen.
///
/// Same admin bypass and fail-closed rules as [`can_access_screen`]; an
/// unrecognized action name is denied for every non-admin level.
pub fn can_perform_action(
    screen_name: &str,
    action: &str,
    level: Option<PermissionLevel>,
    rows: Option<&[ScreenPermission]>,
) -> bool {
    match level {
        Some(level) if level.is_admin() => true,
        Some(_) => {
            let Some(action) = AccessAction::parse(action) else {
                return false;
            };
            rows.is_some_and(|rows| {
                rows.iter()
                    .find(|row| row.screen_name == screen_name)
                    .is_some_and(|row| row.capability(action))
            })
        }
        None => false,
    }
}

/// Authorization data for one caller, loaded once per request and passed by
/// parameter into evaluation calls.
///
/// `screens == None` means the rows were never loaded (fail closed), as
/// opposed to `Some(vec![])` which means loaded-but-empty.
#[derive(Debug, Clone)]
pub struct AuthorizationContext {
    level: Option<PermissionLevel>,
    screens: Option<Vec<ScreenPermission>>,
}

impl AuthorizationContext {
    pub fn new(level: Option<PermissionLevel>, screens: Vec<ScreenPermission>) -> Self {
        Self {
            level,
            screens: Some(screens),
        }
    }

    /// Context that denies everything; used when permission data could not
    /// be loaded.
    pub fn denied() -> Self {
        Self {
            level: None,
            screens: None,
        }
    }

    pub fn level(&self) -> Option<PermissionLevel> {
        self.level
    }

    pub fn screens(&self) -> &[ScreenPermission] {
        self.screens.as_deref().unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.level.is_some_and(|level| level.is_admin())
    }

    pub fn can_access_screen(&self, screen_name: &str) -> bool {
        can_access_screen(screen_name, self.level, self.screens.as_deref())
    }

    pub fn can_perform_action(&self, screen_name: &str, action: &str) -> bool {
        can_perform_action(screen_name, action, self.level, self.screens.as_deref())
    }
}
