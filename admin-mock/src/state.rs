//! Mock backend state
//!
//! Seeded in-memory tables plus the test hooks: a request log, the response
//! envelope toggle and per-search response delays.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::http::{Method, Uri};
use chrono::Utc;
use parking_lot::Mutex;
use shared::UserInfo;
use shared::models::{Account, AccountStatus, Effect, Permission, Role, Rule};

pub const SEED_USERNAME: &str = "admin";
pub const SEED_PASSWORD: &str = "admin123";

/// One request as seen by the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct AccountRecord {
    pub account: Account,
    pub password: String,
}

#[derive(Debug, Default)]
pub(crate) struct MockData {
    pub accounts: Vec<AccountRecord>,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    pub rules: Vec<Rule>,
    /// token -> account id
    pub tokens: HashMap<String, String>,
}

impl MockData {
    fn seeded() -> Self {
        let now = Utc::now().to_rfc3339();
        let permission = |id: &str, name: &str, code: &str| Permission {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            description: None,
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        let permissions = vec![
            permission("p-account-read", "View accounts", "account:read"),
            permission("p-account-write", "Manage accounts", "account:write"),
            permission("p-role-read", "View roles", "role:read"),
            permission("p-role-write", "Manage roles", "role:write"),
        ];

        let roles = vec![
            Role {
                id: "r-admin".into(),
                name: "admin".into(),
                desc: Some("Full access".into()),
                permission_ids: Some(permissions.iter().map(|p| p.id.clone()).collect()),
            },
            Role {
                id: "r-op".into(),
                name: "op".into(),
                desc: Some("Operator".into()),
                permission_ids: Some(vec!["p-account-read".into(), "p-role-read".into()]),
            },
        ];

        let rules = vec![
            Rule {
                id: "rule-admin-all".into(),
                role_id: "r-admin".into(),
                resource: "*".into(),
                action: "*".into(),
                effect: Effect::Allow,
                description: None,
                created_at: now.clone(),
                updated_at: now.clone(),
            },
            Rule {
                id: "rule-op-delete".into(),
                role_id: "r-op".into(),
                resource: "account".into(),
                action: "delete".into(),
                effect: Effect::Deny,
                description: Some("Operators cannot delete accounts".into()),
                created_at: now.clone(),
                updated_at: now,
            },
        ];

        let accounts = vec![
            AccountRecord {
                account: Account {
                    id: "u-admin".into(),
                    username: SEED_USERNAME.into(),
                    email: "admin@example.com".into(),
                    phone: None,
                    status: Some(AccountStatus::Active),
                    roles: Some(vec!["r-admin".into()]),
                },
                password: SEED_PASSWORD.into(),
            },
            AccountRecord {
                account: Account {
                    id: "u-operator".into(),
                    username: "operator".into(),
                    email: "operator@example.com".into(),
                    phone: None,
                    status: Some(AccountStatus::Active),
                    roles: Some(vec!["r-op".into()]),
                },
                password: "operator123".into(),
            },
        ];

        Self {
            accounts,
            roles,
            permissions,
            rules,
            tokens: HashMap::new(),
        }
    }

    /// Session payload for an account; role IDs are reported as role names
    pub fn user_info(&self, account: &Account, token: Option<String>) -> UserInfo {
        let roles = account
            .roles
            .iter()
            .flatten()
            .filter_map(|id| self.roles.iter().find(|r| &r.id == id))
            .map(|r| r.name.clone())
            .collect();
        UserInfo {
            id: account.id.clone(),
            name: account.username.clone(),
            email: account.email.clone(),
            avatar_url: None,
            roles,
            token,
        }
    }
}

#[derive(Debug)]
pub struct MockState {
    pub(crate) data: Mutex<MockData>,
    requests: Mutex<Vec<RecordedRequest>>,
    envelope: AtomicBool,
    search_delays: Mutex<HashMap<String, Duration>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    /// Seeded state; responses are wrapped in the `data` envelope
    pub fn new() -> Self {
        Self {
            data: Mutex::new(MockData::seeded()),
            requests: Mutex::new(Vec::new()),
            envelope: AtomicBool::new(true),
            search_delays: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_envelope(self, enabled: bool) -> Self {
        self.set_envelope(enabled);
        self
    }

    pub fn set_envelope(&self, enabled: bool) {
        self.envelope.store(enabled, Ordering::SeqCst);
    }

    pub fn envelope(&self) -> bool {
        self.envelope.load(Ordering::SeqCst)
    }

    /// Delays list responses whose search term is exactly `search`
    pub fn delay_search(&self, search: impl Into<String>, delay: Duration) {
        self.search_delays.lock().insert(search.into(), delay);
    }

    pub(crate) fn search_delay(&self, search: &str) -> Option<Duration> {
        self.search_delays.lock().get(search).copied()
    }

    pub(crate) fn record(&self, method: &Method, uri: &Uri) {
        self.requests.lock().push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of recorded requests matching method and path
    pub fn count_requests(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }

    pub(crate) fn issue_token(&self, account_id: &str) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.data
            .lock()
            .tokens
            .insert(token.clone(), account_id.to_string());
        token
    }

    pub(crate) fn revoke_token(&self, token: &str) {
        self.data.lock().tokens.remove(token);
    }

    /// Invalidates every issued token, as an expired session would
    pub fn revoke_all_tokens(&self) {
        self.data.lock().tokens.clear();
    }

    pub(crate) fn account_for_token(&self, token: &str) -> Option<Account> {
        let data = self.data.lock();
        let account_id = data.tokens.get(token)?;
        data.accounts
            .iter()
            .find(|r| &r.account.id == account_id)
            .map(|r| r.account.clone())
    }

    pub fn account_count(&self) -> usize {
        self.data.lock().accounts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_admin_has_admin_role_name() {
        let state = MockState::new();
        let data = state.data.lock();
        let admin = &data.accounts[0].account;
        let info = data.user_info(admin, None);
        assert_eq!(info.name, SEED_USERNAME);
        assert_eq!(info.roles, vec!["admin".to_string()]);
    }

    #[test]
    fn test_tokens() {
        let state = MockState::new();
        let token = state.issue_token("u-admin");
        assert_eq!(state.account_for_token(&token).map(|a| a.id), Some("u-admin".into()));
        state.revoke_all_tokens();
        assert!(state.account_for_token(&token).is_none());
    }
}
