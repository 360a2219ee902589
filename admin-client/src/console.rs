//! Console context
//!
//! [`AdminConsole`] wires the session, navigator, request client and every
//! store together. One per process; tests build one per case over an
//! in-process transport.

use std::sync::Arc;

use shared::UserInfo;

use crate::client::{HttpClient, RequestClient};
use crate::config::ConsoleConfig;
use crate::progress::ProgressIndicator;
use crate::router::{Navigator, modules};
use crate::service::{
    AccountService, PermissionService, Permissions, RoleService, Roles, RuleService, Rules,
    UserService,
};
use crate::session::SessionContext;
use crate::store::{AccountStore, EntityStore, SessionStore};
use crate::{ClientError, ClientResult};

#[derive(Debug)]
pub struct AdminConsole {
    config: ConsoleConfig,
    session: SessionContext,
    progress: ProgressIndicator,
    navigator: Navigator,
    client: RequestClient,
    auth: SessionStore,
    accounts: AccountStore,
    roles: EntityStore<Roles>,
    permissions: EntityStore<Permissions>,
    rules: EntityStore<Rules>,
}

impl AdminConsole {
    /// Console over the network transport described by `config`
    pub fn connect(config: ConsoleConfig) -> ClientResult<Self> {
        let transport = config.build_transport()?;
        Ok(Self::with_transport(config, transport))
    }

    /// Console over any transport
    pub fn with_transport(config: ConsoleConfig, transport: Arc<dyn HttpClient>) -> Self {
        let session = match config.session_storage() {
            Some(storage) => SessionContext::with_storage(storage),
            None => SessionContext::new(),
        };
        let progress = ProgressIndicator::new();
        let table = modules::default_table();
        let navigator = if config.prompt_on_deny {
            Navigator::with_login_prompt(table, session.clone())
        } else {
            Navigator::new(table, session.clone())
        };
        let client = RequestClient::new(
            transport,
            session.clone(),
            navigator.clone(),
            progress.clone(),
        );

        let page_size = config.page_size;
        Self {
            auth: SessionStore::new(UserService::new(client.clone()), session.clone()),
            accounts: AccountStore::from_store(EntityStore::with_page_size(
                AccountService::new(client.clone()),
                page_size,
            )),
            roles: EntityStore::with_page_size(RoleService::new(client.clone()), page_size),
            permissions: EntityStore::with_page_size(
                PermissionService::new(client.clone()),
                page_size,
            ),
            rules: EntityStore::with_page_size(RuleService::new(client.clone()), page_size),
            config,
            session,
            progress,
            navigator,
            client,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn progress(&self) -> &ProgressIndicator {
        &self.progress
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    pub fn auth(&self) -> &SessionStore {
        &self.auth
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn roles(&self) -> &EntityStore<Roles> {
        &self.roles
    }

    pub fn permissions(&self) -> &EntityStore<Permissions> {
        &self.permissions
    }

    pub fn rules(&self) -> &EntityStore<Rules> {
        &self.rules
    }

    /// Restores the persisted session and rehydrates it from the backend
    ///
    /// A rejected token (401) leaves the console signed out and returns
    /// `Ok(None)`. Any other rehydration failure keeps the restored identity.
    pub async fn start(&self) -> ClientResult<Option<UserInfo>> {
        let Some(restored) = self.auth.restore()? else {
            tracing::info!("No persisted session");
            return Ok(None);
        };

        match self.auth.fetch_current_user().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session rehydrated");
                Ok(self.session.snapshot().user_info())
            }
            Err(ClientError::Unauthorized) => {
                tracing::info!(user_id = %restored.id, "Persisted session rejected");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Keeping restored session without rehydration");
                Ok(Some(restored))
            }
        }
    }

    pub fn shutdown(self) {
        tracing::info!(
            logged_in = self.session.is_logged_in(),
            in_flight = self.progress.in_flight(),
            "Admin console shutting down"
        );
        self.navigator.prompt().close();
    }
}
