//! Employee domain models

use crate::models::permission::PermissionLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Employee record. Owns the user account: `permissao_usuario` is the
/// assigned permission level, `None` until an administrator grants one.
#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    pub id: Uuid,
    pub full_name: String,
    pub registration_number: Option<String>,
    pub role_title: Option<String>,
    pub email: Option<String>,
    pub active: bool,
    pub permissao_usuario: Option<PermissionLevel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create employee request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(length(min = 1, max = 40))]
    pub registration_number: Option<String>,
    #[validate(length(min = 1, max = 80))]
    pub role_title: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Update employee request; omitted fields keep their current value
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, max = 80))]
    pub role_title: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub active: Option<bool>,
}
