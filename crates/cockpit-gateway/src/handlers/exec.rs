//! Prompt execution endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use cockpit_core::{load_config, AiConfig, ExecMode, ExecutionResult, ProcessOutput};
use cockpit_exec::{CommandRunner, ExecutionBackend, HttpTransport};

use super::{parse_json, read_body};
use crate::error::ApiError;
use crate::state::GatewayState;

/// Request body for `POST /api/exec`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecRequest {
    /// Prompt text; may be empty.
    pub prompt: String,
    /// Overrides the configured mode for this request.
    #[serde(default)]
    pub mode: Option<String>,
    /// Overrides the configured CLI.
    #[serde(default)]
    pub cli: Option<String>,
    /// Overrides the configured provider.
    #[serde(default)]
    pub provider: Option<String>,
    /// Overrides the configured model.
    #[serde(default)]
    pub model: Option<String>,
}

impl ExecRequest {
    /// Combine the request with the project settings into a concrete backend.
    ///
    /// In CLI mode the prompt is appended after the configured arguments.
    #[must_use]
    pub fn into_backend(self, ai: &AiConfig) -> ExecutionBackend {
        let mode = self.mode.map_or(ai.mode, ExecMode::from);

        match mode {
            ExecMode::Api => ExecutionBackend::Api {
                provider: self.provider.unwrap_or_else(|| ai.provider.clone()),
                model: self.model.unwrap_or_else(|| ai.model.clone()),
                prompt: self.prompt,
            },
            ExecMode::Cli => {
                let mut args = ai.args.clone();
                args.push(self.prompt);
                ExecutionBackend::Cli {
                    cli: self.cli.unwrap_or_else(|| ai.cli.clone()),
                    args,
                }
            }
        }
    }
}

/// Run a prompt through the configured backend.
///
/// A completed run is returned as-is, whatever its exit code. Any adapter
/// failure becomes `500 {"error": ...}`.
pub async fn exec<R, T>(
    State(state): State<Arc<GatewayState<R, T>>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ProcessOutput>, ApiError>
where
    R: CommandRunner + 'static,
    T: HttpTransport + 'static,
{
    let request: ExecRequest = parse_json(&read_body(body)?)?;
    let config = load_config(&state.project_root())?;
    let backend = request.into_backend(&config.ai);

    match state.executor.execute(&backend).await {
        ExecutionResult::Completed(output) => {
            tracing::info!(
                backend = %backend.target(),
                exit_code = output.exit_code,
                "Execution finished"
            );
            Ok(Json(output))
        }
        ExecutionResult::Failed { error } => {
            tracing::warn!(backend = %backend.target(), error = %error, "Execution failed");
            Err(ApiError::Execution(error))
        }
    }
}
