// admin-client/src/client/http_oneshot.rs
// Oneshot HTTP transport - in-memory calls against an axum Router

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::Request;
use tower::ServiceExt;

use crate::{ClientError, ClientResult};

use super::http::{ApiRequest, HttpClient, RawResponse};

/// Oneshot HTTP transport (in-memory)
///
/// Drives a `Router` through Tower's `oneshot`, so an embedded or mock
/// backend can be exercised without opening a socket.
///
/// # Example
///
/// ```ignore
/// use admin_client::OneshotHttpClient;
///
/// let router = admin_mock::router(state);
/// let transport = OneshotHttpClient::new(router);
/// ```
#[derive(Debug, Clone)]
pub struct OneshotHttpClient {
    router: Router,
}

impl OneshotHttpClient {
    /// `router` must already have its state attached
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    fn build_request(request: &ApiRequest) -> ClientResult<Request<Body>> {
        let mut builder = Request::builder()
            .method(request.method.clone())
            .uri(request.path.as_str());

        if let Some(auth) = request.auth_header() {
            builder = builder.header(http::header::AUTHORIZATION, auth);
        }

        let body = match &request.body {
            Some(value) => {
                builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(value)?)
            }
            None => Body::empty(),
        };

        builder
            .body(body)
            .map_err(|e| ClientError::Transport(format!("Failed to build request: {}", e)))
    }
}

#[async_trait]
impl HttpClient for OneshotHttpClient {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        let http_request = Self::build_request(&request)?;

        // Router 的错误类型是 Infallible
        let response = self
            .router
            .clone()
            .oneshot(http_request)
            .await
            .map_err(|e| ClientError::Transport(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read body: {}", e)))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use http::{Method, StatusCode};

    #[tokio::test]
    async fn test_oneshot_roundtrip() {
        let router: Router = Router::new().route("/ping", get(|| async { "pong" }));
        let client = OneshotHttpClient::new(router);

        let response = client
            .execute(ApiRequest::new(Method::GET, "/ping"))
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, b"pong");
    }

    #[tokio::test]
    async fn test_oneshot_unknown_route() {
        let client = OneshotHttpClient::new(Router::new());
        let response = client
            .execute(ApiRequest::new(Method::GET, "/missing"))
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
