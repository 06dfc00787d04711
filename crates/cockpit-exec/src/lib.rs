//! Execution adapters for the cockpit bridge.
//!
//! A prompt reaches an AI backend in one of two ways:
//!
//! - [`CliAdapter`] runs a whitelisted local tool such as `claude` or `gemini`
//! - [`ApiAdapter`] calls a provider HTTP API described in the registry
//!
//! Both return a [`cockpit_core::ExecutionResult`]; neither lets an error
//! escape. [`Executor`] selects between them for an [`ExecutionBackend`].
//!
//! # Example
//!
//! ```no_run
//! use cockpit_exec::{
//!     ApiAdapter, CliAdapter, ExecutionBackend, Executor, ReqwestTransport, TokioCommandRunner,
//!     DEFAULT_API_TIMEOUT,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = Executor::new(
//!     CliAdapter::new(TokioCommandRunner::default()),
//!     ApiAdapter::new(ReqwestTransport::new(DEFAULT_API_TIMEOUT)?),
//! );
//!
//! let backend = ExecutionBackend::Cli {
//!     cli: "claude".into(),
//!     args: vec!["-p".into(), "Summarize the README".into()],
//! };
//! let result = executor.execute(&backend).await;
//! println!("{}", serde_json::to_string(&result)?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod backend;
pub mod cli;
pub mod error;

pub use api::{
    ApiAdapter, Credentials, EnvCredentials, HttpTransport, ReqwestTransport, TransportResponse,
    DEFAULT_API_TIMEOUT,
};
pub use backend::{ExecutionBackend, Executor};
pub use cli::{
    is_allowed, CliAdapter, CommandRunner, TokioCommandRunner, ALLOWED_CLIS, DEFAULT_CLI_TIMEOUT,
};
pub use error::{RunError, TransportError};

#[cfg(any(test, feature = "test-utils"))]
pub use api::MockTransport;
#[cfg(any(test, feature = "test-utils"))]
pub use cli::MockCommandRunner;
