//! Session context
//!
//! The signed-in identity, shared by the request client, the router guard
//! and the stores. Built explicitly at startup and injected where needed;
//! there is no global session.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::UserInfo;
use thiserror::Error;

/// Name shown while nobody is signed in
pub const GUEST_NAME: &str = "Guest";

/// Session file name inside the data directory
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum SessionStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identity fields plus the login flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub roles: Vec<String>,
    pub token: Option<String>,
    pub is_logged_in: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: GUEST_NAME.to_string(),
            email: String::new(),
            avatar_url: String::new(),
            roles: Vec::new(),
            token: None,
            is_logged_in: false,
        }
    }
}

impl SessionState {
    /// Stores the identity and sets the login flag
    ///
    /// A missing token keeps the current one: `GET /api/user` does not
    /// repeat the token issued at login.
    pub fn set_login(&mut self, info: UserInfo) {
        self.id = info.id;
        self.name = info.name;
        self.email = info.email;
        self.avatar_url = info.avatar_url.unwrap_or_default();
        self.roles = info.roles;
        if info.token.is_some() {
            self.token = info.token;
        }
        self.is_logged_in = true;
    }

    /// Back to the guest state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Name with its first letter upper-cased, or the guest name
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => GUEST_NAME.to_string(),
        }
    }

    /// The identity as the backend would report it
    pub fn user_info(&self) -> Option<UserInfo> {
        self.is_logged_in.then(|| UserInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar_url: (!self.avatar_url.is_empty()).then(|| self.avatar_url.clone()),
            roles: self.roles.clone(),
            token: self.token.clone(),
        })
    }
}

/// Session storage - JSON file
#[derive(Debug, Clone)]
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    pub fn new(base_path: impl Into<PathBuf>, filename: &str) -> Self {
        let path = base_path.into().join(filename);
        Self { path }
    }

    /// Ensure the parent directory exists
    pub fn ensure_dir(&self) -> Result<(), SessionStorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn save(&self, user: &UserInfo) -> Result<(), SessionStorageError> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// `Ok(None)` when nothing was persisted
    pub fn load(&self) -> Result<Option<UserInfo>, SessionStorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn delete(&self) -> Result<(), SessionStorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Shared handle to the session
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    state: Arc<RwLock<SessionState>>,
    storage: Option<SessionStorage>,
}

impl SessionContext {
    /// In-memory session, nothing persisted
    pub fn new() -> Self {
        Self::default()
    }

    /// Session persisted to `storage` on every login/clear
    pub fn with_storage(storage: SessionStorage) -> Self {
        Self {
            state: Arc::default(),
            storage: Some(storage),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.read().is_logged_in
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn roles(&self) -> Vec<String> {
        self.state.read().roles.clone()
    }

    pub fn display_name(&self) -> String {
        self.state.read().display_name()
    }

    pub fn storage(&self) -> Option<&SessionStorage> {
        self.storage.as_ref()
    }

    /// Stores the identity and persists it
    ///
    /// A persistence failure is logged; the in-memory session stays valid.
    pub fn set_login(&self, info: UserInfo) {
        let persisted = {
            let mut state = self.state.write();
            state.set_login(info);
            state.user_info()
        };

        if let (Some(storage), Some(user)) = (&self.storage, persisted)
            && let Err(e) = storage.save(&user)
        {
            tracing::warn!(path = %storage.path().display(), error = %e, "Failed to persist session");
        }
    }

    /// Resets to guest and removes the persisted session
    pub fn clear(&self) {
        self.state.write().reset();

        if let Some(storage) = &self.storage
            && let Err(e) = storage.delete()
        {
            tracing::warn!(path = %storage.path().display(), error = %e, "Failed to remove persisted session");
        }
    }

    /// Loads the persisted session, if any, into memory
    pub fn restore(&self) -> Result<Option<UserInfo>, SessionStorageError> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };
        let user = storage.load()?;
        if let Some(user) = &user {
            self.state.write().set_login(user.clone());
            tracing::debug!(user_id = %user.id, "Session restored");
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn alice() -> UserInfo {
        UserInfo {
            id: "u1".into(),
            name: "alice".into(),
            email: "alice@example.com".into(),
            avatar_url: None,
            roles: vec!["admin".into()],
            token: Some("tok-1".into()),
        }
    }

    #[test]
    fn test_default_is_guest() {
        let state = SessionState::default();
        assert!(!state.is_logged_in);
        assert_eq!(state.display_name(), GUEST_NAME);
        assert!(state.user_info().is_none());
    }

    #[test]
    fn test_display_name_capitalised() {
        let mut state = SessionState::default();
        state.set_login(alice());
        assert_eq!(state.display_name(), "Alice");
    }

    #[test]
    fn test_set_login_keeps_token_when_absent() {
        let mut state = SessionState::default();
        state.set_login(alice());
        state.set_login(UserInfo {
            token: None,
            name: "alice2".into(),
            ..alice()
        });
        assert_eq!(state.token.as_deref(), Some("tok-1"));
        assert_eq!(state.name, "alice2");
    }

    #[test]
    fn test_storage_roundtrip_and_delete() {
        let dir = TempDir::new().unwrap();
        let storage = SessionStorage::new(dir.path().join("nested"), SESSION_FILE);
        assert!(storage.load().unwrap().is_none());

        storage.save(&alice()).unwrap();
        assert!(storage.exists());
        assert_eq!(storage.load().unwrap(), Some(alice()));

        storage.delete().unwrap();
        assert!(!storage.exists());
    }

    #[test]
    fn test_context_persists_and_clears() {
        let dir = TempDir::new().unwrap();
        let storage = SessionStorage::new(dir.path(), SESSION_FILE);
        let ctx = SessionContext::with_storage(storage.clone());

        ctx.set_login(alice());
        assert!(ctx.is_logged_in());
        assert!(storage.exists());

        let restored = SessionContext::with_storage(storage.clone());
        assert_eq!(restored.restore().unwrap().map(|u| u.id), Some("u1".into()));
        assert!(restored.is_logged_in());
        assert_eq!(restored.token().as_deref(), Some("tok-1"));

        ctx.clear();
        assert!(!ctx.is_logged_in());
        assert!(!storage.exists());
        assert_eq!(ctx.snapshot(), SessionState::default());
    }
}
