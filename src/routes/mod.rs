//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the widget and homepage JSON APIs plus a health probe under a
//! single Axum router. Errors leave handlers as `ApiError`, which renders
//! `{"error": "<message>"}` with the mapped status code.

pub mod homepages;
pub mod widgets;

use axum::Router;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "good-neighbor";

/// Full application router.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    api_routes(state)
        .layer(cors_layer(&config.cors_origin))
        .layer(TraceLayer::new_for_http())
}

/// API routes without CORS or tracing layers.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/widgets", get(widgets::list_widgets).post(widgets::create_widget))
        .route(
            "/api/widgets/{id}",
            get(widgets::get_widget)
                .put(widgets::update_widget)
                .delete(widgets::delete_widget),
        )
        .route("/api/widgets/{id}/position", patch(widgets::update_position))
        .route(
            "/api/homepages",
            get(homepages::list_homepages).post(homepages::create_homepage),
        )
        .route(
            "/api/homepages/{id}",
            get(homepages::get_homepage)
                .put(homepages::rename_homepage)
                .delete(homepages::delete_homepage),
        )
        .route("/api/homepages/{id}/default", patch(homepages::set_default_homepage))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!(%origin, "invalid CORS_ORIGIN; allowing any origin");
            layer.allow_origin(Any)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// `GET /api/health` — liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy", service: SERVICE_NAME, version: env!("CARGO_PKG_VERSION") })
}

/// Body returned by successful deletes.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub status: &'static str,
    pub id: uuid::Uuid,
}

impl DeletedResponse {
    #[must_use]
    pub fn new(id: uuid::Uuid) -> Self {
        Self { status: "deleted", id }
    }
}

/// Handler error rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        }
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    /// Send one request through the router and decode the JSON body
    /// (`Value::Null` when the body is empty or not JSON).
    pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
