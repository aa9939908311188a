//! HTTP gateway (Axum) for message generation and recommendations.
//!
//! This module is primarily used by the `petal` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{messages_handler, recommendations_handler};
pub use state::HandlerState;

use crate::constants::{PETAL_STATUS_HEADER, PETAL_STATUS_HEALTHY, PETAL_STATUS_READY};

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/messages", post(messages_handler))
        .route("/v1/recommendations", post(recommendations_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub vectordb: &'static str,
    pub cache: &'static str,
    pub embedder_mode: &'static str,
    pub provider_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        PETAL_STATUS_HEADER,
        HeaderValue::from_static(PETAL_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let vectordb_status = if state.workflow.ranking().is_ready().await {
        PETAL_STATUS_READY
    } else {
        "pending"
    };

    let components = ComponentStatus {
        http: PETAL_STATUS_READY,
        vectordb: vectordb_status,
        cache: state.workflow.cache_backend(),
        embedder_mode: if state.embedder_stub { "stub" } else { "real" },
        provider_mode: if state.mock_provider { "mock" } else { "llm" },
    };

    let is_ready = components.vectordb == PETAL_STATUS_READY;
    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };

    let mut headers = HeaderMap::new();
    headers.insert(
        PETAL_STATUS_HEADER,
        HeaderValue::from_static(if is_ready { PETAL_STATUS_READY } else { "pending" }),
    );

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
