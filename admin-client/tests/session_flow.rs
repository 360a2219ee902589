//! Login, logout, persistence and the 401 path

mod common;

use std::sync::Arc;

use admin_client::client::{ApiRequest, HttpClient, RawResponse};
use admin_client::router::LOGIN_PATH;
use admin_client::{AdminConsole, ClientError, ClientResult, ConsoleConfig, RouterError};
use admin_mock::{MockState, SEED_PASSWORD, SEED_USERNAME};
use async_trait::async_trait;
use tempfile::TempDir;

use common::{console, persistent_console, signed_in};

/// Transport whose every call fails before reaching a server
#[derive(Debug)]
struct Offline;

#[async_trait]
impl HttpClient for Offline {
    async fn execute(&self, _request: ApiRequest) -> ClientResult<RawResponse> {
        Err(ClientError::Transport("connection refused".into()))
    }
}

#[tokio::test]
async fn test_login_sets_identity() {
    let state = Arc::new(MockState::new());
    let console = console(&state);
    assert_eq!(console.auth().display_name(), "Guest");

    let user = console.auth().login(SEED_USERNAME, SEED_PASSWORD).await.unwrap();
    assert_eq!(user.name, SEED_USERNAME);
    assert!(user.token.is_some());

    let session = console.auth().state();
    assert!(session.is_logged_in);
    assert_eq!(session.roles, vec!["admin".to_string()]);
    assert_eq!(console.auth().display_name(), "Admin");
}

#[tokio::test]
async fn test_wrong_password_leaves_guest() {
    let state = Arc::new(MockState::new());
    let console = console(&state);

    let err = console.auth().login(SEED_USERNAME, "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)), "unexpected: {err:?}");
    assert!(!console.auth().is_logged_in());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let state = Arc::new(MockState::new());
    let console = signed_in(&state).await;

    console.auth().logout().await.unwrap();
    assert!(!console.auth().is_logged_in());
    assert_eq!(console.auth().state(), Default::default());
    assert_eq!(state.count_requests("POST", "/api/logout"), 1);
}

#[tokio::test]
async fn test_logout_clears_session_when_offline() {
    let dir = TempDir::new().unwrap();
    let config = ConsoleConfig::default().with_data_dir(dir.path());
    let console = AdminConsole::with_transport(config, Arc::new(Offline));
    console.session().set_login(shared::UserInfo {
        id: "u1".into(),
        name: "alice".into(),
        email: "alice@example.com".into(),
        avatar_url: None,
        roles: vec!["admin".into()],
        token: Some("stale".into()),
    });
    let storage = console.config().session_storage().unwrap();
    assert!(storage.exists());

    let err = console.auth().logout().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert!(!console.auth().is_logged_in());
    assert_eq!(console.auth().display_name(), "Guest");
    assert!(!storage.exists());
}

#[tokio::test]
async fn test_unauthorized_response_forces_login() {
    let state = Arc::new(MockState::new());
    let console = signed_in(&state).await;
    console.navigator().navigate("/accounts").unwrap();
    assert_eq!(console.navigator().current(), "/accounts");

    state.revoke_all_tokens();
    let err = console.accounts().refresh().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!console.session().is_logged_in());
    assert!(console.session().token().is_none());
    assert_eq!(console.navigator().current(), LOGIN_PATH);
    assert!(!console.accounts().loading());
    assert!(!console.progress().is_active());
}

#[tokio::test]
async fn test_guard_redirects_guest_and_prompts_once() {
    let state = Arc::new(MockState::new());
    let console = console(&state);

    let first = console.navigator().navigate("/accounts").unwrap();
    assert_eq!(first.path, LOGIN_PATH);
    assert_eq!(first.redirected_from.as_deref(), Some("/accounts"));
    assert!(first.prompt_opened);

    let second = console.navigator().navigate("/role").unwrap();
    assert_eq!(second.path, LOGIN_PATH);
    assert!(!second.prompt_opened);

    console.navigator().prompt().close();
    console.auth().login(SEED_USERNAME, SEED_PASSWORD).await.unwrap();
    let allowed = console.navigator().navigate("/accounts").unwrap();
    assert_eq!(allowed.path, "/accounts");
    assert!(allowed.redirected_from.is_none());

    let err = console.navigator().navigate("/nowhere").unwrap_err();
    assert_eq!(err, RouterError::NotFound("/nowhere".into()));
}

#[tokio::test]
async fn test_start_rehydrates_persisted_session() {
    let dir = TempDir::new().unwrap();
    let state = Arc::new(MockState::new());

    let first = persistent_console(&state, dir.path());
    first.auth().login(SEED_USERNAME, SEED_PASSWORD).await.unwrap();
    let token = first.session().token();
    first.shutdown();

    let second = persistent_console(&state, dir.path());
    assert!(!second.session().is_logged_in());
    let user = second.start().await.unwrap().unwrap();
    assert_eq!(user.name, SEED_USERNAME);
    assert!(second.session().is_logged_in());
    assert_eq!(second.session().token(), token);
    assert_eq!(state.count_requests("GET", "/api/user"), 1);
}

#[tokio::test]
async fn test_start_with_revoked_token_signs_out() {
    let dir = TempDir::new().unwrap();
    let state = Arc::new(MockState::new());

    let first = persistent_console(&state, dir.path());
    first.auth().login(SEED_USERNAME, SEED_PASSWORD).await.unwrap();
    state.revoke_all_tokens();

    let second = persistent_console(&state, dir.path());
    assert!(second.start().await.unwrap().is_none());
    assert!(!second.session().is_logged_in());
    assert!(!second.config().session_storage().unwrap().exists());
}

#[tokio::test]
async fn test_start_without_persisted_session() {
    let state = Arc::new(MockState::new());
    let console = console(&state);
    assert!(console.start().await.unwrap().is_none());
    assert!(state.requests().is_empty());
}
