//! Core types and utilities for the cockpit bridge.
//!
//! This crate holds everything the gateway needs that does not touch the
//! network or spawn processes:
//!
//! - **Configuration**: project-root discovery and `.cockpit.json` loading
//! - **Providers**: the static table of remote AI providers
//! - **Write guard**: containment of filesystem writes inside the project root
//! - **Results**: the normalized shape every execution backend returns
//!
//! # Example
//!
//! ```no_run
//! use cockpit_core::{load_config, resolve_project_root};
//!
//! let root = resolve_project_root();
//! let config = load_config(&root)?;
//! println!("AI mode: {}", config.ai.mode);
//! # Ok::<(), cockpit_core::ConfigError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod guard;
pub mod providers;
pub mod result;

pub use config::{
    install_dir, load_config, resolve_project_root, resolve_project_root_from, AiConfig,
    Configuration, ExecMode, CONFIG_FILE_NAME, DEFAULT_CLI, DEFAULT_PROVIDER,
};
pub use error::{ConfigError, GuardError, RegistryError};
pub use guard::resolve_contained;
pub use providers::{BuiltRequest, ProviderSpec, PROVIDERS};
pub use result::{ExecutionResult, ProcessOutput};
