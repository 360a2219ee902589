//! Navigator
//!
//! Resolves paths against the route table, runs the guard and keeps the
//! current location. The request client calls [`Navigator::force_login`]
//! when the backend answers 401.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::session::SessionContext;

use super::guard::{self, GuardDecision, LOGIN_PATH, LoginPrompt};
use super::route::{RouteTable, normalize};
use super::RouterError;

/// Result of a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Where the navigator ended up
    pub path: String,
    pub route_name: Option<String>,
    /// Requested path when the guard redirected
    pub redirected_from: Option<String>,
    /// Whether this navigation opened the login prompt
    pub prompt_opened: bool,
}

#[derive(Debug)]
struct NavigatorInner {
    table: RouteTable,
    session: SessionContext,
    prompt: LoginPrompt,
    prompt_on_deny: bool,
    location: RwLock<String>,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    inner: Arc<NavigatorInner>,
}

impl Navigator {
    pub fn new(table: RouteTable, session: SessionContext) -> Self {
        Self::build(table, session, false)
    }

    /// Open the login prompt when the guard denies a navigation
    pub fn with_login_prompt(table: RouteTable, session: SessionContext) -> Self {
        Self::build(table, session, true)
    }

    fn build(table: RouteTable, session: SessionContext, prompt_on_deny: bool) -> Self {
        Self {
            inner: Arc::new(NavigatorInner {
                table,
                session,
                prompt: LoginPrompt::new(),
                prompt_on_deny,
                location: RwLock::new("/".to_string()),
            }),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.inner.table
    }

    pub fn prompt(&self) -> &LoginPrompt {
        &self.inner.prompt
    }

    pub fn current(&self) -> String {
        self.inner.location.read().clone()
    }

    /// Navigates to `path`, subject to the guard
    pub fn navigate(&self, path: &str) -> Result<Navigation, RouterError> {
        let route = self
            .inner
            .table
            .resolve(path)
            .ok_or_else(|| RouterError::NotFound(path.to_string()))?;

        match guard::check(route, &self.inner.session.snapshot()) {
            GuardDecision::Allow => {
                *self.inner.location.write() = route.path.clone();
                tracing::debug!(path = %route.path, "Navigated");
                Ok(Navigation {
                    path: route.path.clone(),
                    route_name: route.name.clone(),
                    redirected_from: None,
                    prompt_opened: false,
                })
            }
            GuardDecision::Redirect(target) => {
                let prompt_opened = self.inner.prompt_on_deny && self.inner.prompt.try_open();
                tracing::info!(from = %normalize(path), to = %target, "Navigation denied, login required");
                *self.inner.location.write() = target.clone();
                let route_name = self
                    .inner
                    .table
                    .resolve(&target)
                    .and_then(|r| r.name.clone());
                Ok(Navigation {
                    path: target,
                    route_name,
                    redirected_from: Some(normalize(path)),
                    prompt_opened,
                })
            }
        }
    }

    /// Moves to the login route without consulting the guard
    pub fn force_login(&self) {
        let mut location = self.inner.location.write();
        if *location != LOGIN_PATH {
            tracing::info!(from = %*location, "Forcing navigation to login");
            *location = LOGIN_PATH.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::modules::default_table;
    use shared::UserInfo;

    fn member() -> UserInfo {
        UserInfo {
            id: "u1".into(),
            name: "alice".into(),
            email: "a@x.io".into(),
            avatar_url: None,
            roles: vec![],
            token: None,
        }
    }

    #[test]
    fn test_anonymous_redirected() {
        let nav = Navigator::new(default_table(), SessionContext::new());
        let result = nav.navigate("/accounts").unwrap();
        assert_eq!(result.path, LOGIN_PATH);
        assert_eq!(result.route_name.as_deref(), Some("Login"));
        assert_eq!(result.redirected_from.as_deref(), Some("/accounts"));
        assert!(!result.prompt_opened);
        assert_eq!(nav.current(), LOGIN_PATH);
    }

    #[test]
    fn test_logged_in_allowed() {
        let session = SessionContext::new();
        session.set_login(member());
        let nav = Navigator::new(default_table(), session);
        let result = nav.navigate("/rule/").unwrap();
        assert_eq!(result.path, "/rule");
        assert!(result.redirected_from.is_none());
        assert_eq!(nav.current(), "/rule");
    }

    #[test]
    fn test_unknown_route() {
        let nav = Navigator::new(default_table(), SessionContext::new());
        assert_eq!(
            nav.navigate("/nope"),
            Err(RouterError::NotFound("/nope".into()))
        );
    }

    #[test]
    fn test_prompt_opened_once() {
        let nav = Navigator::with_login_prompt(default_table(), SessionContext::new());
        assert!(nav.navigate("/accounts").unwrap().prompt_opened);
        assert!(!nav.navigate("/role").unwrap().prompt_opened);
        nav.prompt().close();
        assert!(nav.navigate("/role").unwrap().prompt_opened);
    }

    #[test]
    fn test_force_login() {
        let session = SessionContext::new();
        session.set_login(member());
        let nav = Navigator::new(default_table(), session);
        nav.navigate("/accounts").unwrap();
        nav.force_login();
        assert_eq!(nav.current(), LOGIN_PATH);
    }
}
