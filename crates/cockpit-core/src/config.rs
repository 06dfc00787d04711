//! Project root discovery and gateway configuration loading.
//!
//! The configuration lives in an optional `.cockpit.json` at the project root.
//! It is read fresh on every call; nothing is cached between requests.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = ".cockpit.json";

/// Directory whose presence marks a version-controlled project root.
pub const VCS_MARKER: &str = ".git";

/// Number of directories examined when walking upward for the project root.
pub const MAX_ROOT_DEPTH: usize = 6;

/// CLI used when the configuration does not name one.
pub const DEFAULT_CLI: &str = "claude";

/// Provider used when the configuration does not name one.
pub const DEFAULT_PROVIDER: &str = "anthropic";

/// Which kind of execution backend handles a prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ExecMode {
    /// Run a whitelisted local command-line tool.
    #[default]
    Cli,
    /// Call a remote provider HTTP API.
    Api,
}

impl From<String> for ExecMode {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&str> for ExecMode {
    fn from(value: &str) -> Self {
        if value == "api" {
            Self::Api
        } else {
            Self::Cli
        }
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => f.write_str("cli"),
            Self::Api => f.write_str("api"),
        }
    }
}

/// The `ai` section of the configuration file.
///
/// Every field falls back to its own default, so a partially specified
/// section keeps the values it does set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Backend kind used when a request does not override it.
    #[serde(default)]
    pub mode: ExecMode,

    /// Command-line tool to invoke in CLI mode.
    #[serde(default = "AiConfig::default_cli")]
    pub cli: String,

    /// Arguments placed before the prompt on every CLI invocation.
    #[serde(default)]
    pub args: Vec<String>,

    /// Provider identifier used in API mode.
    #[serde(default = "AiConfig::default_provider")]
    pub provider: String,

    /// Model name passed to the provider; empty selects the provider default.
    #[serde(default)]
    pub model: String,

    /// Keys the gateway does not interpret, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AiConfig {
    fn default_cli() -> String {
        DEFAULT_CLI.to_string()
    }

    fn default_provider() -> String {
        DEFAULT_PROVIDER.to_string()
    }

    /// The CLI name in CLI mode, the provider in API mode.
    #[must_use]
    pub fn backend_label(&self) -> &str {
        match self.mode {
            ExecMode::Cli => &self.cli,
            ExecMode::Api => &self.provider,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            mode: ExecMode::Cli,
            cli: Self::default_cli(),
            args: Vec::new(),
            provider: Self::default_provider(),
            model: String::new(),
            extra: Map::new(),
        }
    }
}

/// The full contents of `.cockpit.json` with defaults applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// AI backend settings.
    #[serde(default)]
    pub ai: AiConfig,

    /// Top-level keys owned by other tools sharing the file.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Directory containing the running gateway executable.
///
/// Falls back to the current working directory when the executable path
/// cannot be determined.
#[must_use]
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Locate the project root starting from the gateway's install directory.
#[must_use]
pub fn resolve_project_root() -> PathBuf {
    resolve_project_root_from(&install_dir())
}

/// Walk upward from `start` looking for a project root.
///
/// Examines at most [`MAX_ROOT_DEPTH`] directories and returns the first one
/// containing a `.git` directory or a `.cockpit.json` file. When none is found
/// the current working directory is returned. This never fails.
#[must_use]
pub fn resolve_project_root_from(start: &Path) -> PathBuf {
    let mut current = start
        .canonicalize()
        .unwrap_or_else(|_| start.to_path_buf());

    for _ in 0..MAX_ROOT_DEPTH {
        if is_project_root(&current) {
            return current;
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    tracing::debug!(start = %start.display(), "No project root marker found, using cwd");
    std::env::current_dir().unwrap_or_else(|_| start.to_path_buf())
}

fn is_project_root(dir: &Path) -> bool {
    dir.join(VCS_MARKER).exists() || dir.join(CONFIG_FILE_NAME).exists()
}

/// Load `.cockpit.json` from `root`, applying defaults to every unset field.
///
/// A missing file yields the default configuration.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is malformed.
pub fn load_config(root: &Path) -> Result<Configuration, ConfigError> {
    let path = root.join(CONFIG_FILE_NAME);

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Configuration::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
}
