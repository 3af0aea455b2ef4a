//! Tenants and their people

use crate::id::{CompanyId, DepartmentId, PositionId, UserId};
use serde::{Deserialize, Serialize};

/// Tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Company user
///
/// Credentials are owned by the authentication layer and are not part of
/// this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub company_id: CompanyId,
    #[serde(default)]
    pub is_manager: bool,
    #[serde(default)]
    pub is_admin: bool,
}

/// Department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<UserId>,
    pub company_id: CompanyId,
}

/// Job position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: PositionId,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub company_id: CompanyId,
}

fn default_active() -> bool {
    true
}
