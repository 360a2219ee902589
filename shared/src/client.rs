//! Session-related types shared between server and client
//!
//! Login request and the identity returned by the user endpoints.

use serde::{Deserialize, Serialize};

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Identity of the signed-in user
///
/// Returned by `POST /api/login` and `GET /api/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Role codes used for menu filtering
    #[serde(default)]
    pub roles: Vec<String>,
    /// Bearer token, when the backend issues one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_optional_fields_default() {
        let user: UserInfo =
            serde_json::from_str(r#"{"id":"u1","name":"alice","email":"a@x.io"}"#).unwrap();
        assert_eq!(user.avatar_url, None);
        assert!(user.roles.is_empty());
        assert!(user.token.is_none());
    }

    #[test]
    fn test_user_info_camel_case() {
        let user = UserInfo {
            id: "u1".into(),
            name: "alice".into(),
            email: "a@x.io".into(),
            avatar_url: Some("/a.png".into()),
            roles: vec!["admin".into()],
            token: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["avatarUrl"], "/a.png");
        assert!(json.get("token").is_none());
    }
}
