//! HTTP request handlers.
//!
//! This module contains all the endpoint handlers for the bridge API.

pub mod exec;
pub mod fs;
pub mod status;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Unwrap a buffered request body, reporting oversized or broken bodies as
/// ordinary API errors instead of axum's plain-text rejections.
pub(crate) fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| {
        tracing::warn!(status = %rejection.status(), "Request body rejected");
        ApiError::UnreadableBody(rejection.body_text())
    })
}

/// Decode a JSON request body.
///
/// Bodies are taken as raw bytes so a malformed payload is reported the same
/// way as every other failure instead of through axum's rejection types.
pub(crate) fn parse_json<D: DeserializeOwned>(body: &[u8]) -> Result<D, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

/// Fallback for paths with no route and no static file.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
