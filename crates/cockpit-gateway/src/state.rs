//! Gateway application state.
//!
//! This module defines the shared state that is available to all request handlers.
//! Nothing in it changes after startup; per-project settings are re-read on
//! every request.

use std::path::PathBuf;
use std::sync::Arc;

use cockpit_core::resolve_project_root_from;
use cockpit_exec::{CommandRunner, Executor, HttpTransport};

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
pub struct GatewayState<R, T>
where
    R: CommandRunner,
    T: HttpTransport,
{
    /// Dispatches prompts to the CLI or API adapter.
    pub executor: Arc<Executor<R, T>>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<R, T> GatewayState<R, T>
where
    R: CommandRunner,
    T: HttpTransport,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(executor: Arc<Executor<R, T>>, config: GatewayConfig) -> Self {
        Self { executor, config }
    }

    /// Resolve the project root afresh from the configured anchor.
    #[must_use]
    pub fn project_root(&self) -> PathBuf {
        resolve_project_root_from(&self.config.project_anchor)
    }
}
