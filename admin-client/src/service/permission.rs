//! Permission service

use shared::models::{Permission, PermissionCreate, PermissionUpdate};
use shared::NoFilter;

use super::{Endpoints, Resource, ResourceService};

#[derive(Debug)]
pub struct Permissions;

impl Resource for Permissions {
    const NAME: &'static str = "permission";
    const ENDPOINTS: Endpoints = Endpoints::rest("/api/permissions");

    type Entity = Permission;
    type Create = PermissionCreate;
    type Update = PermissionUpdate;
    type Filter = NoFilter;
}

pub type PermissionService = ResourceService<Permissions>;
