//! Gateway configuration types.
//!
//! These are process-level settings fixed at startup. The per-project AI
//! settings live in `.cockpit.json` and are read per request by
//! [`cockpit_core::load_config`].

use std::path::PathBuf;
use std::time::Duration;

use cockpit_core::install_dir;

/// Configuration for the gateway service.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Interface to bind (e.g., "127.0.0.1").
    pub host: String,

    /// First port to try; after binding, the port actually in use.
    pub port: u16,

    /// How many consecutive ports to try before giving up.
    pub max_bind_attempts: u16,

    /// Directory served for every non-API path.
    pub static_dir: PathBuf,

    /// Directory the project-root search starts from.
    pub project_anchor: PathBuf,

    /// Bound on a single CLI invocation, in seconds.
    pub cli_timeout_seconds: u64,

    /// Bound on a single provider API call, in seconds.
    pub api_timeout_seconds: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl GatewayConfig {
    /// Default interface: loopback only.
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";

    /// Default first port.
    pub const DEFAULT_PORT: u16 = 8001;

    /// Default number of ports tried.
    pub const DEFAULT_MAX_BIND_ATTEMPTS: u16 = 20;

    /// Default timeout for both backends, in seconds.
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

    const fn default_max_body() -> usize {
        1024 * 1024 // 1 MB
    }

    /// Get the CLI timeout as a `Duration`.
    #[must_use]
    pub const fn cli_timeout(&self) -> Duration {
        Duration::from_secs(self.cli_timeout_seconds)
    }

    /// Get the provider API timeout as a `Duration`.
    #[must_use]
    pub const fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_seconds)
    }

    /// The only origin allowed by CORS: the gateway's own loopback URL.
    #[must_use]
    pub fn allowed_origin(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Replace the configured port with the one actually bound.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let dir = install_dir();
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            max_bind_attempts: Self::DEFAULT_MAX_BIND_ATTEMPTS,
            static_dir: dir.clone(),
            project_anchor: dir,
            cli_timeout_seconds: Self::DEFAULT_TIMEOUT_SECONDS,
            api_timeout_seconds: Self::DEFAULT_TIMEOUT_SECONDS,
            max_body_bytes: Self::default_max_body(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8001);
        assert_eq!(config.max_bind_attempts, 20);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert_eq!(config.static_dir, config.project_anchor);
    }

    #[test]
    fn timeout_duration() {
        let config = GatewayConfig::default();
        assert_eq!(config.cli_timeout(), Duration::from_secs(60));
        assert_eq!(config.api_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn origin_follows_bound_port() {
        let config = GatewayConfig::default().with_port(8003);
        assert_eq!(config.allowed_origin(), "http://localhost:8003");
    }
}
