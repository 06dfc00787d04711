//! The closed set of execution backends and the executor dispatching over it.

use cockpit_core::{ExecMode, ExecutionResult};

use crate::api::{ApiAdapter, HttpTransport};
use crate::cli::{CliAdapter, CommandRunner};

/// A fully resolved execution target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionBackend {
    /// Run a local command-line tool.
    Cli {
        /// Whitelisted tool identifier.
        cli: String,
        /// Complete argument list, prompt included.
        args: Vec<String>,
    },
    /// Call a remote provider API.
    Api {
        /// Provider identifier.
        provider: String,
        /// Model name; empty selects the provider default.
        model: String,
        /// Prompt text.
        prompt: String,
    },
}

impl ExecutionBackend {
    /// Which mode this backend belongs to.
    #[must_use]
    pub const fn mode(&self) -> ExecMode {
        match self {
            Self::Cli { .. } => ExecMode::Cli,
            Self::Api { .. } => ExecMode::Api,
        }
    }

    /// The CLI or provider name, for logging.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Cli { cli, .. } => cli,
            Self::Api { provider, .. } => provider,
        }
    }
}

/// Owns one adapter per backend kind.
pub struct Executor<R, T> {
    cli: CliAdapter<R>,
    api: ApiAdapter<T>,
}

impl<R, T> Executor<R, T>
where
    R: CommandRunner,
    T: HttpTransport,
{
    /// Create an executor from its two adapters.
    #[must_use]
    pub const fn new(cli: CliAdapter<R>, api: ApiAdapter<T>) -> Self {
        Self { cli, api }
    }

    /// The CLI adapter.
    #[must_use]
    pub const fn cli(&self) -> &CliAdapter<R> {
        &self.cli
    }

    /// The API adapter.
    #[must_use]
    pub const fn api(&self) -> &ApiAdapter<T> {
        &self.api
    }

    /// Run `backend` through the matching adapter.
    pub async fn execute(&self, backend: &ExecutionBackend) -> ExecutionResult {
        tracing::debug!(mode = %backend.mode(), backend = %backend.target(), "Dispatching prompt");
        match backend {
            ExecutionBackend::Cli { cli, args } => self.cli.run(cli, args).await,
            ExecutionBackend::Api {
                provider,
                model,
                prompt,
            } => self.api.run(provider, model, prompt).await,
        }
    }
}
