//! Client-side routing
//!
//! Route records grouped into modules, the navigation guard that sends
//! anonymous users to `/login`, the navigator that tracks the current
//! location, and the role-filtered menu tree.

pub mod guard;
pub mod menu;
pub mod modules;
pub mod navigator;
pub mod route;

pub use guard::{GuardDecision, LOGIN_PATH, LoginPrompt};
pub use menu::MenuItem;
pub use navigator::{Navigation, Navigator};
pub use route::{Layout, ResolvedRoute, RouteMeta, RouteRecord, RouteTable};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("No route matches {0}")]
    NotFound(String),
}
