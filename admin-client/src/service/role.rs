//! Role service

use shared::models::{AssignPermissions, Role, RoleCreate, RoleOption, RoleUpdate};
use shared::NoFilter;

use crate::ClientResult;

use super::{Endpoints, Resource, ResourceService, require_id};

#[derive(Debug)]
pub struct Roles;

impl Resource for Roles {
    const NAME: &'static str = "role";
    const ENDPOINTS: Endpoints = Endpoints::rest("/api/roles");

    type Entity = Role;
    type Create = RoleCreate;
    type Update = RoleUpdate;
    type Filter = NoFilter;
}

pub type RoleService = ResourceService<Roles>;

impl ResourceService<Roles> {
    /// Every role as id/name pairs
    pub async fn all(&self) -> ClientResult<Vec<RoleOption>> {
        self.client().get("/api/roles/all").await
    }

    /// Permission IDs bound to a role
    pub async fn permissions(&self, role_id: &str) -> ClientResult<Vec<String>> {
        let path = format!("{}/permissions", Roles::ENDPOINTS.item(require_id(role_id)?));
        self.client().get(&path).await
    }

    /// Replaces the role's permissions
    pub async fn assign_permissions(
        &self,
        role_id: &str,
        permission_ids: Vec<String>,
    ) -> ClientResult<()> {
        let path = format!("{}/permissions", Roles::ENDPOINTS.item(require_id(role_id)?));
        self.client()
            .post_unit(&path, &AssignPermissions { permission_ids })
            .await
    }
}
