//! Request client
//!
//! Every service call goes through [`RequestClient`]. It attaches the bearer
//! token, drives the progress indicator, unwraps the `data` envelope, and
//! turns a 401 into a global logout: the session is cleared and the navigator
//! is moved to the login route before the error is returned. Each call is a
//! single attempt; nothing is retried.

use std::sync::Arc;

use http::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::unwrap_envelope;

use crate::progress::ProgressIndicator;
use crate::router::Navigator;
use crate::session::SessionContext;
use crate::{ClientError, ClientResult};

use super::http::{ApiRequest, HttpClient};

#[derive(Debug, Clone)]
pub struct RequestClient {
    transport: Arc<dyn HttpClient>,
    session: SessionContext,
    navigator: Navigator,
    progress: ProgressIndicator,
}

impl RequestClient {
    pub fn new(
        transport: Arc<dyn HttpClient>,
        session: SessionContext,
        navigator: Navigator,
        progress: ProgressIndicator,
    ) -> Self {
        Self {
            transport,
            session,
            navigator,
            progress,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn progress(&self) -> &ProgressIndicator {
        &self.progress
    }

    /// GET without query parameters
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let value = self.send(Method::GET, path.to_string(), None).await?;
        decode(value)
    }

    /// GET with `params` encoded as the query string
    pub async fn get_with<T, Q>(&self, path: &str, params: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let query = encode_query(params)?;
        let path = if query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query)
        };
        let value = self.send(Method::GET, path, None).await?;
        decode(value)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        let value = self.send(Method::POST, path.to_string(), Some(body)).await?;
        decode(value)
    }

    /// POST without a body, ignoring the response payload
    pub async fn post_empty(&self, path: &str) -> ClientResult<()> {
        self.send(Method::POST, path.to_string(), None).await?;
        Ok(())
    }

    /// POST with a body, ignoring the response payload
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path.to_string(), Some(body)).await?;
        Ok(())
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        let value = self.send(Method::PUT, path.to_string(), Some(body)).await?;
        decode(value)
    }

    /// DELETE, ignoring the response payload
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send(Method::DELETE, path.to_string(), None).await?;
        Ok(())
    }

    /// One exchange; returns the unwrapped payload
    async fn send(&self, method: Method, path: String, body: Option<Value>) -> ClientResult<Value> {
        let _progress = self.progress.start();

        let mut request = ApiRequest::new(method, path).with_token(self.session.token());
        if let Some(body) = body {
            request = request.with_body(body);
        }
        let (method, path) = (request.method.clone(), request.path.clone());
        tracing::debug!(method = %method, path = %path, "Sending request");

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(method = %method, path = %path, error = %e, "Request failed");
                return Err(e);
            }
        };
        let status = response.status;

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(method = %method, path = %path, "Unauthorized, clearing session");
            self.session.clear();
            self.navigator.force_login();
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let err = ClientError::from_status(status, &response.body);
            tracing::debug!(method = %method, path = %path, status = status.as_u16(), error = %err, "Request rejected");
            return Err(err);
        }

        tracing::debug!(method = %method, path = %path, status = status.as_u16(), "Response received");

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        let raw: Value = serde_json::from_slice(&response.body)
            .map_err(|e| ClientError::InvalidResponse(format!("JSON parse error: {}", e)))?;
        Ok(unwrap_envelope(raw))
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> ClientResult<T> {
    serde_json::from_value(value)
        .map_err(|e| ClientError::InvalidResponse(format!("Unexpected payload: {}", e)))
}

/// Encodes a flat serializable value as `application/x-www-form-urlencoded`
///
/// Nulls are skipped, arrays repeat the key, nested objects are sent as JSON.
pub fn encode_query<Q: Serialize + ?Sized>(params: &Q) -> ClientResult<String> {
    let value = serde_json::to_value(params)?;
    let map = match value {
        Value::Object(map) => map,
        Value::Null => return Ok(String::new()),
        other => {
            return Err(ClientError::Validation(format!(
                "query parameters must be an object, got {}",
                other
            )));
        }
    };

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in &map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    serializer.append_pair(key, &scalar(item));
                }
            }
            other => {
                serializer.append_pair(key, &scalar(other));
            }
        }
    }
    Ok(serializer.finish())
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shared::{ListQuery, UserInfo};

    use crate::client::http::RawResponse;
    use crate::router::{LOGIN_PATH, modules::default_table};

    /// Replies with a fixed status/body and records requests
    #[derive(Debug)]
    struct Canned {
        status: StatusCode,
        body: &'static str,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl Canned {
        fn new(status: StatusCode, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpClient for Canned {
        async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse> {
            self.seen.lock().push(request);
            Ok(RawResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    fn client(transport: Arc<Canned>) -> RequestClient {
        let session = SessionContext::new();
        let navigator = Navigator::new(default_table(), session.clone());
        RequestClient::new(transport, session, navigator, ProgressIndicator::new())
    }

    fn alice() -> UserInfo {
        UserInfo {
            id: "u1".into(),
            name: "alice".into(),
            email: "a@x.io".into(),
            avatar_url: None,
            roles: vec![],
            token: Some("secret".into()),
        }
    }

    #[tokio::test]
    async fn test_envelope_unwrapped() {
        let client = client(Canned::new(StatusCode::OK, r#"{"data":{"list":[],"total":3}}"#));
        let page: shared::ListResponse<serde_json::Value> = client.get("/api/roles").await.unwrap();
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn test_bare_body_accepted() {
        let client = client(Canned::new(StatusCode::OK, r#"["a","b"]"#));
        let ids: Vec<String> = client.get("/api/accounts/1/roles").await.unwrap();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_and_redirects() {
        let transport = Canned::new(StatusCode::UNAUTHORIZED, "");
        let client = client(transport);
        client.session().set_login(alice());
        client.navigator().navigate("/accounts").unwrap();

        let err = client.get::<Value>("/api/accounts").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!client.session().is_logged_in());
        assert_eq!(client.navigator().current(), LOGIN_PATH);
        assert!(!client.progress().is_active());
    }

    #[tokio::test]
    async fn test_token_attached_and_query_encoded() {
        let transport = Canned::new(StatusCode::OK, r#"{"list":[],"total":0}"#);
        let client = client(transport.clone());
        client.session().set_login(alice());

        let query: ListQuery = ListQuery {
            search: "a b".into(),
            ..Default::default()
        };
        let _: shared::ListResponse<Value> = client.get_with("/api/roles", &query).await.unwrap();

        let seen = transport.seen.lock();
        assert_eq!(seen[0].token.as_deref(), Some("secret"));
        assert_eq!(seen[0].path, "/api/roles?page=1&pageSize=20&search=a+b");
    }

    #[tokio::test]
    async fn test_not_found_propagates() {
        let client = client(Canned::new(StatusCode::NOT_FOUND, r#"{"code":404,"message":"gone"}"#));
        let err = client.delete("/api/roles/x").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_empty_body_is_unit() {
        let client = client(Canned::new(StatusCode::NO_CONTENT, ""));
        client.post_empty("/api/logout").await.unwrap();
    }

    #[test]
    fn test_encode_query_skips_nulls_and_repeats_arrays() {
        let qs = encode_query(&serde_json::json!({"a": null, "ids": ["x", "y"], "n": 2})).unwrap();
        assert_eq!(qs, "ids=x&ids=y&n=2");
    }
}
