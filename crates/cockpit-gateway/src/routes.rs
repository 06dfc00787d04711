//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Request};
use axum::handler::HandlerWithoutStateExt;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use cockpit_exec::{CommandRunner, HttpTransport};

use crate::handlers::{exec, fs, not_found, status};
use crate::state::GatewayState;

/// Create the bridge router with all routes and middleware.
///
/// # Routes
///
/// - `GET /api/status` - Liveness, project root and AI settings
/// - `GET /api/config` - Full merged configuration
/// - `POST /api/exec` - Run a prompt through the CLI or API backend
/// - `POST /api/fs/write` - Write a file below the project root
///
/// Every other path is served from the static directory, or 404. Any
/// `OPTIONS` request gets a bare 200; real CORS preflights also carry the
/// allow headers.
///
/// Requests are handled one at a time.
pub fn create_router<R, T>(state: GatewayState<R, T>) -> Router
where
    R: CommandRunner + 'static,
    T: HttpTransport + 'static,
{
    // Extract config values before moving state
    let origin = state.config.allowed_origin();
    let max_body_bytes = state.config.max_body_bytes;
    let static_files = ServeDir::new(&state.config.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    let cors = build_cors_layer(&origin);
    let state = Arc::new(state);

    Router::new()
        .route("/api/status", get(status::status::<R, T>))
        .route("/api/config", get(status::config::<R, T>))
        .route("/api/exec", post(exec::exec::<R, T>))
        .route("/api/fs/write", post(fs::write_file::<R, T>))
        .fallback_service(static_files)
        // Middleware
        .layer(GlobalConcurrencyLimitLayer::new(1))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn(answer_options))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Answer every `OPTIONS` request with an empty 200.
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

/// Build the CORS layer for the bridge's own origin.
fn build_cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(e) => {
            tracing::warn!(origin, error = %e, "Invalid CORS origin; cross-origin requests disabled");
            layer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_own_origin() {
        let _layer = build_cors_layer("http://localhost:8001");
    }

    #[test]
    fn cors_invalid_origin_does_not_panic() {
        let _layer = build_cors_layer("http://local\nhost");
    }
}
