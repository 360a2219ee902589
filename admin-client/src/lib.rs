//! Admin Client - client core of the admin console
//!
//! Request client, entity services and stores, router guard and session
//! handling for the admin REST backend.

pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod logger;
pub mod progress;
pub mod router;
pub mod service;
pub mod session;
pub mod store;

pub use client::{HttpClient, NetworkHttpClient, OneshotHttpClient, RequestClient};
pub use config::ConsoleConfig;
pub use console::AdminConsole;
pub use error::{ClientError, ClientResult};
pub use logger::init_logger;
pub use progress::ProgressIndicator;
pub use router::{GuardDecision, Navigator, RouterError};
pub use session::{SessionContext, SessionState, SessionStorage};
pub use store::{AccountStore, EntityStore, FetchOutcome, SessionStore, StoreState};

// Re-export shared types for convenience
pub use shared::{ListQuery, ListResponse, UserInfo};
