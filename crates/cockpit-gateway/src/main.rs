//! Cockpit bridge: local gateway between the cockpit UI and AI backends.
//!
//! Binds loopback (8001 by default, moving up when busy), serves the UI from
//! the static directory and answers the `/api` endpoints. Per-project AI
//! settings come from `.cockpit.json` in the nearest project root.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cockpit_core::load_config;
use cockpit_exec::{ApiAdapter, CliAdapter, Executor, ReqwestTransport, TokioCommandRunner};
use cockpit_gateway::{bind_with_retry, create_router, GatewayConfig, GatewayState};

/// Local bridge between the cockpit UI and AI command-line tools or APIs.
#[derive(Parser, Debug)]
#[command(name = "cockpit-bridge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "COCKPIT_HOST", default_value = GatewayConfig::DEFAULT_HOST)]
    host: String,

    /// First port to try.
    #[arg(short, long, env = "COCKPIT_PORT", default_value_t = GatewayConfig::DEFAULT_PORT)]
    port: u16,

    /// Number of consecutive ports to try.
    #[arg(long, env = "COCKPIT_MAX_BIND_ATTEMPTS", default_value_t = GatewayConfig::DEFAULT_MAX_BIND_ATTEMPTS)]
    max_bind_attempts: u16,

    /// Directory served as the UI (defaults to the executable's directory).
    #[arg(long, env = "COCKPIT_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Directory the project-root search starts from (defaults to the executable's directory).
    #[arg(long, env = "COCKPIT_PROJECT_DIR")]
    project_dir: Option<PathBuf>,

    /// CLI invocation timeout in seconds.
    #[arg(long, env = "COCKPIT_CLI_TIMEOUT", default_value_t = GatewayConfig::DEFAULT_TIMEOUT_SECONDS)]
    cli_timeout: u64,

    /// Provider API timeout in seconds.
    #[arg(long, env = "COCKPIT_API_TIMEOUT", default_value_t = GatewayConfig::DEFAULT_TIMEOUT_SECONDS)]
    api_timeout: u64,
}

impl Args {
    fn into_config(self) -> GatewayConfig {
        let defaults = GatewayConfig::default();
        GatewayConfig {
            host: self.host,
            port: self.port,
            max_bind_attempts: self.max_bind_attempts,
            static_dir: self.static_dir.unwrap_or(defaults.static_dir),
            project_anchor: self.project_dir.unwrap_or(defaults.project_anchor),
            cli_timeout_seconds: self.cli_timeout,
            api_timeout_seconds: self.api_timeout,
            max_body_bytes: defaults.max_body_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cockpit=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Args::parse().into_config();

    let listener = bind_with_retry(&config.host, config.port, config.max_bind_attempts).await?;
    let port = listener.local_addr()?.port();
    let config = config.with_port(port);

    let executor = Executor::new(
        CliAdapter::new(TokioCommandRunner::new(config.cli_timeout())),
        ApiAdapter::new(ReqwestTransport::new(config.api_timeout())?),
    );
    let state = GatewayState::new(Arc::new(executor), config);

    let project_root = state.project_root();
    tracing::info!(
        url = %format!("http://localhost:{port}"),
        static_dir = %state.config.static_dir.display(),
        project_root = %project_root.display(),
        "Cockpit bridge running"
    );
    match load_config(&project_root) {
        Ok(project) => tracing::info!(
            mode = %project.ai.mode,
            backend = %project.ai.backend_label(),
            "AI backend"
        ),
        Err(e) => tracing::warn!(error = %e, "Project configuration unreadable"),
    }

    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Stopping bridge");
}
