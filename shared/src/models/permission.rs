//! Permission Model

use serde::{Deserialize, Serialize};

use crate::request::Identified;

/// Permission entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: String,
    pub name: String,
    /// Unique code checked by the backend (e.g. "accounts:write")
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO-8601
    pub created_at: String,
    /// ISO-8601
    pub updated_at: String,
}

impl Identified for Permission {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create permission payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionCreate {
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Update permission payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionUpdate {
    pub id: String,
    #[serde(flatten)]
    pub fields: PermissionCreate,
}

impl Identified for PermissionUpdate {
    fn id(&self) -> &str {
        &self.id
    }
}
