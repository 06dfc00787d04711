//! HTTP gateway for the cockpit bridge.
//!
//! Serves the cockpit UI's static files and a small JSON API on loopback:
//!
//! - status and configuration reporting for the current project
//! - prompt execution through a whitelisted CLI or a provider API
//! - file writes confined to the project root
//!
//! Requests are processed one at a time. Only the bridge's own
//! `http://localhost:<port>` origin may call it cross-origin.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{bind_with_retry, BindError};
pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;
