//! User (session) service

use shared::{LoginRequest, UserInfo};

use crate::ClientResult;
use crate::client::RequestClient;

#[derive(Debug, Clone)]
pub struct UserService {
    client: RequestClient,
}

impl UserService {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserInfo> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.client.post("/api/login", &request).await
    }

    pub async fn current_user(&self) -> ClientResult<UserInfo> {
        self.client.get("/api/user").await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.client.post_empty("/api/logout").await
    }
}
