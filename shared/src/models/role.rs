//! Role Model

use serde::{Deserialize, Serialize};

use crate::request::Identified;

/// Role entity (RBAC role)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Permission IDs bound to the role, passed through unvalidated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_ids: Option<Vec<String>>,
}

impl Identified for Role {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create role payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_ids: Option<Vec<String>>,
}

/// Update role payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdate {
    pub id: String,
    #[serde(flatten)]
    pub fields: RoleCreate,
}

impl Identified for RoleUpdate {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Compact role entry for pickers (`GET /api/roles/all`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOption {
    pub id: String,
    pub name: String,
}

/// Permission assignment body for `POST /api/roles/{id}/permissions`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPermissions {
    pub permission_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_update_flattens_fields() {
        let update = RoleUpdate {
            id: "r1".into(),
            fields: RoleCreate {
                name: "ops".into(),
                desc: None,
                permission_ids: Some(vec!["p1".into()]),
            },
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "r1", "name": "ops", "permissionIds": ["p1"]})
        );
    }
}
