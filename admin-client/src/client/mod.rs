//! Client module - transports and the shared request client.

pub mod http;
pub mod http_oneshot;
pub mod request;

// Re-export main types
pub use http::{ApiRequest, HttpClient, NetworkHttpClient, RawResponse};
pub use http_oneshot::OneshotHttpClient;
pub use request::RequestClient;
