//! Confined file writes.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use cockpit_core::resolve_contained;
use cockpit_exec::{CommandRunner, HttpTransport};

use super::{parse_json, read_body};
use crate::error::ApiError;
use crate::state::GatewayState;

/// Request body for `POST /api/fs/write`.
#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    /// Path relative to the project root.
    pub path: String,
    /// Full file contents, written as UTF-8.
    pub content: String,
}

/// Successful write response.
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    /// Always `true`.
    pub success: bool,
}

/// Write a file below the project root, creating parent directories.
///
/// Targets that resolve outside the root are rejected with a plain-text 403
/// before anything touches the filesystem.
pub async fn write_file<R, T>(
    State(state): State<Arc<GatewayState<R, T>>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<WriteResponse>, ApiError>
where
    R: CommandRunner + 'static,
    T: HttpTransport + 'static,
{
    let request: WriteRequest = parse_json(&read_body(body)?)?;
    let root = state.project_root();
    let target = resolve_contained(&root, &request.path)?;

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_failure(&request.path, &e))?;
    }
    tokio::fs::write(&target, request.content.as_bytes())
        .await
        .map_err(|e| io_failure(&request.path, &e))?;

    tracing::info!(
        path = %target.display(),
        bytes = request.content.len(),
        "File written"
    );
    Ok(Json(WriteResponse { success: true }))
}

fn io_failure(path: &str, err: &std::io::Error) -> ApiError {
    tracing::error!(path, error = %err, "File write failed");
    ApiError::Internal(err.to_string())
}
