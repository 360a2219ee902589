//! Account service

use shared::models::{Account, AccountCreate, AccountUpdate, AssignRoles, RoleOption};
use shared::NoFilter;

use crate::ClientResult;

use super::{DeleteRoute, Endpoints, Resource, ResourceService, UpdateRoute, require_id};

/// Account resource; updates and deletes go over POST
#[derive(Debug)]
pub struct Accounts;

impl Resource for Accounts {
    const NAME: &'static str = "account";
    const ENDPOINTS: Endpoints = Endpoints {
        collection: "/api/accounts",
        update: UpdateRoute::Post,
        delete: DeleteRoute::PostDelete,
    };

    type Entity = Account;
    type Create = AccountCreate;
    type Update = AccountUpdate;
    type Filter = NoFilter;
}

pub type AccountService = ResourceService<Accounts>;

impl ResourceService<Accounts> {
    /// Every role, for the assignment picker
    pub async fn all_roles(&self) -> ClientResult<Vec<RoleOption>> {
        self.client().get("/api/roles/all").await
    }

    /// Role IDs currently assigned to an account
    pub async fn user_roles(&self, account_id: &str) -> ClientResult<Vec<String>> {
        let path = format!("{}/roles", Accounts::ENDPOINTS.item(require_id(account_id)?));
        self.client().get(&path).await
    }

    /// Replaces the account's roles
    pub async fn assign_roles(&self, account_id: &str, role_ids: Vec<String>) -> ClientResult<()> {
        let path = format!("{}/roles", Accounts::ENDPOINTS.item(require_id(account_id)?));
        let count = role_ids.len();
        self.client().post_unit(&path, &AssignRoles { role_ids }).await?;
        tracing::info!(account_id = %account_id, roles = count, "Roles assigned");
        Ok(())
    }
}
