//! Error types shared by the cockpit crates.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the project configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the expected shape.
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by the provider registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The requested provider identifier is not in the registry.
    #[error("Unknown provider '{provider}'. Supported: {supported}")]
    UnknownProvider {
        /// The identifier the caller asked for.
        provider: String,
        /// Comma-separated list of known identifiers.
        supported: String,
    },
}

/// Errors raised by the filesystem write guard.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The target resolves to a location outside the project root.
    #[error("Forbidden: Path outside project root")]
    OutsideRoot {
        /// The resolved target path.
        path: PathBuf,
    },

    /// Part of the target exists but cannot be resolved, or a chain of
    /// symbolic links is too long to follow.
    #[error("Forbidden: cannot resolve {path}")]
    Unresolvable {
        /// The partially resolved target path.
        path: PathBuf,
    },

    /// The project root itself could not be canonicalized.
    #[error("failed to resolve project root {path}: {source}")]
    Root {
        /// The project root that failed to resolve.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
