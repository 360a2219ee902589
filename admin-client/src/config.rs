//! Console configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `ADMIN_API_BASE_URL` | `http://localhost:8080` |
//! | `ADMIN_API_TIMEOUT` | `10` (seconds) |
//! | `ADMIN_DATA_DIR` | `./.admin-console` |
//! | `ADMIN_PAGE_SIZE` | `20` |
//! | `LOG_LEVEL` | `info` |
//! | `LOG_JSON` | `false` |
//! | `LOG_DIR` | unset (console only) |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use shared::DEFAULT_PAGE_SIZE;

use crate::ClientResult;
use crate::client::{HttpClient, NetworkHttpClient};
use crate::session::{SESSION_FILE, SessionStorage};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DATA_DIR: &str = "./.admin-console";

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend base URL
    pub base_url: String,
    /// Per-request deadline
    pub timeout: Duration,
    /// Directory holding the persisted session; `None` keeps it in memory
    pub data_dir: Option<PathBuf>,
    /// Initial page size of every store
    pub page_size: u32,
    /// Open the login prompt when the guard redirects
    pub prompt_on_deny: bool,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            data_dir: Some(PathBuf::from(DEFAULT_DATA_DIR)),
            page_size: DEFAULT_PAGE_SIZE,
            prompt_on_deny: true,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
        }
    }
}

impl ConsoleConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Reads the environment; unset or unparsable values fall back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("ADMIN_API_BASE_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("ADMIN_API_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            data_dir: std::env::var("ADMIN_DATA_DIR")
                .ok()
                .map(PathBuf::from)
                .or(defaults.data_dir),
            page_size: std::env::var("ADMIN_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
            prompt_on_deny: defaults.prompt_on_deny,
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_json),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Keep the session in memory only
    pub fn without_persistence(mut self) -> Self {
        self.data_dir = None;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_prompt_on_deny(mut self, enabled: bool) -> Self {
        self.prompt_on_deny = enabled;
        self
    }

    pub fn session_storage(&self) -> Option<SessionStorage> {
        self.data_dir
            .as_ref()
            .map(|dir| SessionStorage::new(dir, SESSION_FILE))
    }

    /// reqwest transport for `base_url`
    pub fn build_transport(&self) -> ClientResult<Arc<dyn HttpClient>> {
        Ok(Arc::new(NetworkHttpClient::new(&self.base_url, self.timeout)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.page_size, 20);
        assert!(config.session_storage().is_some());
    }

    #[test]
    fn test_builders() {
        let config = ConsoleConfig::new("http://api.test")
            .with_page_size(0)
            .without_persistence();
        assert_eq!(config.base_url, "http://api.test");
        assert_eq!(config.page_size, 1);
        assert!(config.session_storage().is_none());
    }
}
