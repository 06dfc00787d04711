//! Status and configuration endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use cockpit_core::{load_config, AiConfig, Configuration};
use cockpit_exec::{CommandRunner, HttpTransport};

use crate::error::ApiError;
use crate::state::GatewayState;

/// Status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Always `"online"` while the bridge answers.
    pub status: &'static str,
    /// Bridge version.
    pub version: &'static str,
    /// Project root resolved for this request.
    pub project_root: String,
    /// Effective AI settings.
    pub ai: AiConfig,
}

/// Report liveness, the resolved project root and the AI settings.
///
/// ```text
/// GET /api/status
///
/// Response: 200 OK
/// {
///   "status": "online",
///   "version": "2.0.0",
///   "project_root": "/home/me/project",
///   "ai": { "mode": "cli", "cli": "claude", "args": ["-p"], "provider": "anthropic", "model": "" }
/// }
/// ```
pub async fn status<R, T>(
    State(state): State<Arc<GatewayState<R, T>>>,
) -> Result<Json<StatusResponse>, ApiError>
where
    R: CommandRunner + 'static,
    T: HttpTransport + 'static,
{
    let root = state.project_root();
    let config = load_config(&root)?;

    Ok(Json(StatusResponse {
        status: "online",
        version: env!("CARGO_PKG_VERSION"),
        project_root: root.display().to_string(),
        ai: config.ai,
    }))
}

/// Return the whole merged configuration, unknown keys included.
pub async fn config<R, T>(
    State(state): State<Arc<GatewayState<R, T>>>,
) -> Result<Json<Configuration>, ApiError>
where
    R: CommandRunner + 'static,
    T: HttpTransport + 'static,
{
    let config = load_config(&state.project_root())?;
    Ok(Json(config))
}
