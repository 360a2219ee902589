//! Entity services
//!
//! One generic [`ResourceService`] replaces the per-entity service modules.
//! A [`Resource`] describes an entity: its payload types, list filter and
//! endpoint table. Resource-specific extras (role assignment, permission
//! binding) are inherent impls on the concrete service type.

pub mod account;
pub mod permission;
pub mod role;
pub mod rule;
pub mod user;

pub use account::{AccountService, Accounts};
pub use permission::{PermissionService, Permissions};
pub use role::{RoleService, Roles};
pub use rule::{RuleService, Rules};
pub use user::UserService;

use std::fmt::Debug;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{Identified, ListQuery, ListResponse};

use crate::client::RequestClient;
use crate::{ClientError, ClientResult};

/// How an update is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRoute {
    /// `PUT {collection}/{id}`
    Put,
    /// `POST {collection}/{id}`
    Post,
}

/// How a delete is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteRoute {
    /// `DELETE {collection}/{id}`
    Delete,
    /// `POST {collection}/{id}/delete`
    PostDelete,
}

/// Endpoint table of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    /// Collection path, e.g. `/api/roles`
    pub collection: &'static str,
    pub update: UpdateRoute,
    pub delete: DeleteRoute,
}

impl Endpoints {
    /// REST defaults: `PUT` to update, `DELETE` to delete
    pub const fn rest(collection: &'static str) -> Self {
        Self {
            collection,
            update: UpdateRoute::Put,
            delete: DeleteRoute::Delete,
        }
    }

    pub fn item(&self, id: &str) -> String {
        format!("{}/{}", self.collection, id)
    }
}

/// Entity descriptor
pub trait Resource: Send + Sync + 'static {
    /// Name used in logs
    const NAME: &'static str;
    const ENDPOINTS: Endpoints;

    type Entity: Identified + DeserializeOwned + Clone + Debug + Send + Sync + 'static;
    type Create: Serialize + Debug + Send + Sync;
    type Update: Identified + Serialize + Debug + Send + Sync;
    type Filter: Serialize + Clone + Default + Debug + PartialEq + Send + Sync + 'static;
}

/// CRUD calls for one resource
pub struct ResourceService<R: Resource> {
    client: RequestClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone())
    }
}

impl<R: Resource> Debug for ResourceService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceService")
            .field("resource", &R::NAME)
            .finish()
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(client: RequestClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    /// One page of the collection
    pub async fn list(&self, query: &ListQuery<R::Filter>) -> ClientResult<ListResponse<R::Entity>> {
        if !query.is_valid() {
            return Err(ClientError::Validation(format!(
                "page and pageSize must be at least 1 (page={}, pageSize={})",
                query.page, query.page_size
            )));
        }
        self.client.get_with(R::ENDPOINTS.collection, query).await
    }

    /// Creates an entity; the backend assigns the id
    pub async fn create(&self, payload: &R::Create) -> ClientResult<R::Entity> {
        let entity: R::Entity = self.client.post(R::ENDPOINTS.collection, payload).await?;
        tracing::info!(resource = R::NAME, id = %entity.id(), "Created");
        Ok(entity)
    }

    pub async fn update(&self, payload: &R::Update) -> ClientResult<R::Entity> {
        let path = R::ENDPOINTS.item(require_id(payload.id())?);
        let entity = match R::ENDPOINTS.update {
            UpdateRoute::Put => self.client.put(&path, payload).await?,
            UpdateRoute::Post => self.client.post(&path, payload).await?,
        };
        tracing::info!(resource = R::NAME, id = %payload.id(), "Updated");
        Ok(entity)
    }

    /// Deletes by id; a missing entity surfaces as `ClientError::NotFound`
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let path = R::ENDPOINTS.item(require_id(id)?);
        match R::ENDPOINTS.delete {
            DeleteRoute::Delete => self.client.delete(&path).await?,
            DeleteRoute::PostDelete => self.client.post_empty(&format!("{}/delete", path)).await?,
        }
        tracing::info!(resource = R::NAME, id = %id, "Deleted");
        Ok(())
    }
}

pub(crate) fn require_id(id: &str) -> ClientResult<&str> {
    if id.trim().is_empty() {
        Err(ClientError::Validation("id is required".into()))
    } else {
        Ok(id)
    }
}
