//! Account store
//!
//! The generic list store plus the role-assignment picker state.

use std::ops::Deref;

use parking_lot::RwLock;
use shared::models::RoleOption;

use crate::ClientResult;
use crate::service::{AccountService, Accounts};

use super::EntityStore;

#[derive(Debug)]
pub struct AccountStore {
    entities: EntityStore<Accounts>,
    all_roles: RwLock<Vec<RoleOption>>,
    selected_role_ids: RwLock<Vec<String>>,
}

impl AccountStore {
    pub fn new(service: AccountService) -> Self {
        Self::from_store(EntityStore::new(service))
    }

    pub fn from_store(entities: EntityStore<Accounts>) -> Self {
        Self {
            entities,
            all_roles: RwLock::new(Vec::new()),
            selected_role_ids: RwLock::new(Vec::new()),
        }
    }

    pub fn entities(&self) -> &EntityStore<Accounts> {
        &self.entities
    }

    pub fn all_roles(&self) -> Vec<RoleOption> {
        self.all_roles.read().clone()
    }

    pub fn selected_role_ids(&self) -> Vec<String> {
        self.selected_role_ids.read().clone()
    }

    /// Loads every role for the picker; empties the list on failure
    pub async fn load_all_roles(&self) -> ClientResult<Vec<RoleOption>> {
        let result = {
            let _loading = self.entities.begin_loading();
            self.entities.service().all_roles().await
        };
        match self.entities.settle("load_all_roles", result) {
            Ok(roles) => {
                *self.all_roles.write() = roles.clone();
                Ok(roles)
            }
            Err(e) => {
                self.all_roles.write().clear();
                Err(e)
            }
        }
    }

    /// Loads the roles assigned to `account_id`; empties the selection on failure
    pub async fn load_user_roles(&self, account_id: &str) -> ClientResult<Vec<String>> {
        let result = {
            let _loading = self.entities.begin_loading();
            self.entities.service().user_roles(account_id).await
        };
        match self.entities.settle("load_user_roles", result) {
            Ok(ids) => {
                *self.selected_role_ids.write() = ids.clone();
                Ok(ids)
            }
            Err(e) => {
                self.selected_role_ids.write().clear();
                Err(e)
            }
        }
    }

    /// Replaces the account's roles, then refreshes the list
    pub async fn assign_roles(&self, account_id: &str, role_ids: Vec<String>) -> ClientResult<()> {
        let result = {
            let _loading = self.entities.begin_loading();
            self.entities.service().assign_roles(account_id, role_ids.clone()).await
        };
        self.entities.settle("assign_roles", result)?;
        *self.selected_role_ids.write() = role_ids;
        self.entities.refresh_after("assign_roles").await;
        Ok(())
    }
}

impl Deref for AccountStore {
    type Target = EntityStore<Accounts>;

    fn deref(&self) -> &Self::Target {
        &self.entities
    }
}
