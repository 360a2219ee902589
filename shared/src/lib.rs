//! Shared types for the admin console
//!
//! Wire DTOs used by both the client library and the mock backend:
//! entity models, create/update payloads, list queries, list responses
//! and the response envelope helpers.

pub mod client;
pub mod models;
pub mod request;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use client::{LoginRequest, UserInfo};
pub use request::{Identified, ListQuery, NoFilter, DEFAULT_PAGE_SIZE};
pub use response::{unwrap_envelope, ApiErrorBody, ListResponse};
