//! Session store
//!
//! Login/logout flow over [`UserService`], writing into the shared
//! [`SessionContext`].

use shared::UserInfo;

use crate::ClientResult;
use crate::service::UserService;
use crate::session::{SessionContext, SessionState};

#[derive(Debug, Clone)]
pub struct SessionStore {
    service: UserService,
    session: SessionContext,
}

impl SessionStore {
    pub fn new(service: UserService, session: SessionContext) -> Self {
        Self { service, session }
    }

    pub fn context(&self) -> &SessionContext {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.snapshot()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn display_name(&self) -> String {
        self.session.display_name()
    }

    /// Signs in and persists the session
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserInfo> {
        let user = self.service.login(username, password).await.inspect_err(|e| {
            tracing::warn!(username = %username, error = %e, "Login failed");
        })?;
        self.session.set_login(user.clone());
        tracing::info!(user_id = %user.id, username = %username, "Logged in");
        Ok(user)
    }

    /// Signs out
    ///
    /// Local state is cleared whatever the backend answers; a failed call is
    /// still returned.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.service.logout().await;
        self.session.clear();
        match &result {
            Ok(()) => tracing::info!("Logged out"),
            Err(e) => tracing::warn!(error = %e, "Logout request failed; local session cleared"),
        }
        result
    }

    /// Overwrites the local identity with the backend's
    pub async fn fetch_current_user(&self) -> ClientResult<UserInfo> {
        let user = self.service.current_user().await.inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to fetch current user");
        })?;
        self.session.set_login(user.clone());
        Ok(user)
    }

    /// Loads the persisted session, if any
    pub fn restore(&self) -> ClientResult<Option<UserInfo>> {
        Ok(self.session.restore()?)
    }
}
