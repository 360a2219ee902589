//! Admin Mock - in-memory admin backend
//!
//! Serves the admin REST surface from seeded in-memory data. Used by the
//! client's integration tests through an in-process transport, and as a
//! standalone server for trying the console.

pub mod api;
pub mod error;
pub mod state;

pub use api::router;
pub use error::ApiError;
pub use state::{MockState, RecordedRequest, SEED_PASSWORD, SEED_USERNAME};
