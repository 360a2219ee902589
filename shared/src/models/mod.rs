//! Data models
//!
//! Entities managed by the console and their create/update payloads.
//! All IDs are opaque strings assigned by the backend.

pub mod account;
pub mod permission;
pub mod role;
pub mod rule;

// Re-exports
pub use account::*;
pub use permission::*;
pub use role::*;
pub use rule::*;
