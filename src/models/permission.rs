//! Permission domain models
//! Permission levels, the screen catalog and the screen permission row

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Catalog of screens the admin UI can grant access to. Screen names are
/// route segments; assignment requests naming anything else are rejected.
pub const SCREEN_CATALOG: &[&str] = &[
    "dashboard",
    "employees",
    "fleets",
    "equipment",
    "cost-centers",
    "mass-requests",
    "mass-programming",
    "checklist",
    "reports",
    "permissions",
];

/// Role identifier assigned to a user account.
///
/// The string values are persisted in `funcionarios.permissao_usuario` and in
/// `screen_permissions.permission_level`; they must never change. `admin` is
/// the distinguished super-level that bypasses all per-screen checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Admin,
    Rh,
    Transporte,
    Logistica,
    Planejamento,
    Motorista,
    Operador,
    Apontador,
    Encarregado,
    Engenheiro,
    Balanca,
}

impl PermissionLevel {
    /// Every assignable level, in presentation order
    pub const ALL: &'static [PermissionLevel] = &[
        PermissionLevel::Admin,
        PermissionLevel::Rh,
        PermissionLevel::Transporte,
        PermissionLevel::Logistica,
        PermissionLevel::Planejamento,
        PermissionLevel::Motorista,
        PermissionLevel::Operador,
        PermissionLevel::Apontador,
        PermissionLevel::Encarregado,
        PermissionLevel::Engenheiro,
        PermissionLevel::Balanca,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Admin => "admin",
            PermissionLevel::Rh => "rh",
            PermissionLevel::Transporte => "transporte",
            PermissionLevel::Logistica => "logistica",
            PermissionLevel::Planejamento => "planejamento",
            PermissionLevel::Motorista => "motorista",
            PermissionLevel::Operador => "operador",
            PermissionLevel::Apontador => "apontador",
            PermissionLevel::Encarregado => "encarregado",
            PermissionLevel::Engenheiro => "engenheiro",
            PermissionLevel::Balanca => "balanca",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, PermissionLevel::Admin)
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionLevel::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown permission level: {}", s)))
    }
}

/// Mutating action gated per screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessAction {
    Create,
    Edit,
    Delete,
}

impl AccessAction {
    /// Parse an action name; anything unrecognized is `None` so callers
    /// resolve it to denied rather than an error.
    pub fn parse(s: &str) -> Option<AccessAction> {
        match s {
            "create" => Some(AccessAction::Create),
            "edit" => Some(AccessAction::Edit),
            "delete" => Some(AccessAction::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessAction::Create => "create",
            AccessAction::Edit => "edit",
            AccessAction::Delete => "delete",
        }
    }
}

/// One row of the screen permission store.
///
/// The natural key is (permission_level, screen_name); the store never holds
/// two rows for the same pair. `id` and `created_at` are surrogate identity
/// and audit fields, never consulted by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenPermission {
    pub id: Uuid,
    pub permission_level: PermissionLevel,
    pub screen_name: String,
    pub can_access: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub created_at: DateTime<Utc>,
}

impl ScreenPermission {
    pub fn capability(&self, action: AccessAction) -> bool {
        match action {
            AccessAction::Create => self.can_create,
            AccessAction::Edit => self.can_edit,
            AccessAction::Delete => self.can_delete,
        }
    }
}

/// Admin assignment flow submission: target level plus the screens the level
/// may access. An empty screen list revokes every screen for that level.
#[derive(Debug, Deserialize)]
pub struct AssignPermissionRequest {
    pub permission_level: String,
    #[serde(default)]
    pub screens: Vec<String>,
}
