// admin-client/src/client/http.rs
// HTTP transport - network calls

use std::time::Duration;

use async_trait::async_trait;
use http::{Method, StatusCode};
use reqwest::Client;
use serde_json::Value;

use crate::{ClientError, ClientResult};

/// A request as seen by a transport
///
/// `path` is relative to the backend base URL and already carries the
/// encoded query string.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            token: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub(crate) fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

/// Status and body of a completed exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// HTTP transport trait
///
/// Transports only move bytes; status handling, envelope unwrapping and
/// decoding live in [`RequestClient`](super::RequestClient).
#[async_trait]
pub trait HttpClient: Send + Sync + std::fmt::Debug {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse>;
}

#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        let url = self.url(&request.path);
        let mut req = self.client.request(request.method.clone(), &url);
        if let Some(auth) = request.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }
        // 超时/连接错误 -> ClientError::Http
        let response = req.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let client = NetworkHttpClient::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/roles"), "http://localhost:8080/api/roles");
        assert_eq!(client.url("api/roles"), "http://localhost:8080/api/roles");
    }

    #[test]
    fn test_auth_header() {
        let req = ApiRequest::new(Method::GET, "/api/user").with_token(Some("t0k".into()));
        assert_eq!(req.auth_header().as_deref(), Some("Bearer t0k"));
        assert!(ApiRequest::new(Method::GET, "/").auth_header().is_none());
    }
}
