//! Navigation guard

use std::sync::atomic::{AtomicBool, Ordering};

use crate::session::SessionState;

use super::route::ResolvedRoute;

/// Where anonymous users are sent
pub const LOGIN_PATH: &str = "/login";

/// Outcome of the guard for one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Routes that require auth are closed to anonymous sessions
pub fn check(route: &ResolvedRoute, session: &SessionState) -> GuardDecision {
    if route.meta.requires_auth && !session.is_logged_in {
        GuardDecision::Redirect(LOGIN_PATH.to_string())
    } else {
        GuardDecision::Allow
    }
}

/// At most one login prompt open at a time
///
/// Denied navigations ask to open the prompt; only the first succeeds until
/// the prompt is closed.
#[derive(Debug, Default)]
pub struct LoginPrompt {
    open: AtomicBool,
}

impl LoginPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if this call opened the prompt
    pub fn try_open(&self) -> bool {
        self.open
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}
