//! Shared setup for the integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use admin_client::client::{ApiRequest, HttpClient, RawResponse};
use admin_client::{AdminConsole, ClientError, ClientResult, ConsoleConfig, OneshotHttpClient};
use async_trait::async_trait;
use http::Method;
use admin_mock::{MockState, RecordedRequest, SEED_PASSWORD, SEED_USERNAME};

/// Console over the in-process mock, session kept in memory
pub fn console(state: &Arc<MockState>) -> AdminConsole {
    console_with(state, ConsoleConfig::default().without_persistence())
}

/// Console over the in-process mock, session persisted under `dir`
pub fn persistent_console(state: &Arc<MockState>, dir: &Path) -> AdminConsole {
    console_with(state, ConsoleConfig::default().with_data_dir(dir))
}

pub fn console_with(state: &Arc<MockState>, config: ConsoleConfig) -> AdminConsole {
    let transport = Arc::new(OneshotHttpClient::new(admin_mock::router(state.clone())));
    AdminConsole::with_transport(config, transport)
}

pub async fn signed_in(state: &Arc<MockState>) -> AdminConsole {
    let console = console(state);
    console
        .auth()
        .login(SEED_USERNAME, SEED_PASSWORD)
        .await
        .expect("seeded login");
    state.clear_requests();
    console
}

/// Decoded query pairs of a recorded request
pub fn query_pairs(request: &RecordedRequest) -> Vec<(String, String)> {
    url::form_urlencoded::parse(request.query.as_deref().unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

pub fn last_get(state: &MockState, path: &str) -> RecordedRequest {
    state
        .requests()
        .into_iter()
        .rev()
        .find(|r| r.method == "GET" && r.path == path)
        .expect("no GET recorded")
}

/// In-process transport whose GETs can be switched to fail
#[derive(Debug)]
pub struct FlakyGets {
    inner: OneshotHttpClient,
    failing: AtomicBool,
}

impl FlakyGets {
    pub fn fail_gets(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpClient for FlakyGets {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        if request.method == Method::GET && self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("connection reset".into()));
        }
        self.inner.execute(request).await
    }
}

/// Signed-in console over a transport whose GETs can be made to fail
pub async fn signed_in_flaky(state: &Arc<MockState>) -> (AdminConsole, Arc<FlakyGets>) {
    let transport = Arc::new(FlakyGets {
        inner: OneshotHttpClient::new(admin_mock::router(state.clone())),
        failing: AtomicBool::new(false),
    });
    let console = AdminConsole::with_transport(
        ConsoleConfig::default().without_persistence(),
        transport.clone(),
    );
    console
        .auth()
        .login(SEED_USERNAME, SEED_PASSWORD)
        .await
        .expect("seeded login");
    state.clear_requests();
    (console, transport)
}
