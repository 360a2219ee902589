//! Permission Rule Model
//!
//! A rule binds a role to a resource/action pair with an allow or deny
//! effect.

use serde::{Deserialize, Serialize};

use crate::request::Identified;

/// Rule effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

/// Permission rule entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub role_id: String,
    /// Resource kind, e.g. "menu", "api", "button"
    pub resource: String,
    /// Action, e.g. "read", "write", "delete"
    pub action: String,
    pub effect: Effect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Identified for Rule {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create rule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCreate {
    pub role_id: String,
    pub resource: String,
    pub action: String,
    pub effect: Effect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Update rule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleUpdate {
    pub id: String,
    #[serde(flatten)]
    pub fields: RuleCreate,
}

impl Identified for RuleUpdate {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Rule list filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFilter {
    /// Only rules of this role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
}
