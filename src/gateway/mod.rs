//! HTTP gateway (Axum) for restaurant search.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{
    NeighborhoodResponse, SearchRequest, SearchResponse, neighborhood_by_zipcode_handler,
    search_restaurants_handler,
};
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/search-restaurants", post(search_restaurants_handler))
        .route(
            "/api/neighborhood-by-zipcode/{zipcode}",
            get(neighborhood_by_zipcode_handler),
        )
        .layer(TraceLayer::new_for_http())
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
    pub dataset: &'static str,
    pub index: &'static str,
    pub embedder_mode: &'static str,
    pub reranker: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let pipeline = &state.pipeline;

    let dataset_status = if pipeline.restaurants().is_empty() {
        "empty"
    } else {
        "ready"
    };
    let index_status = if pipeline.index().is_available() {
        "ready"
    } else {
        "unavailable"
    };
    let embedder_mode = if pipeline.embedder().is_stub() {
        "stub"
    } else {
        "real"
    };
    let reranker_status = if pipeline.reranker().is_enabled() {
        "enabled"
    } else {
        "disabled"
    };

    let components = ComponentStatus {
        http: "ready",
        dataset: dataset_status,
        index: index_status,
        embedder_mode,
        reranker: reranker_status,
    };

    let is_ready = components.dataset == "ready" && components.index == "ready";
    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadyResponse {
            status: if is_ready { "ready" } else { "degraded" },
            components,
        }),
    )
        .into_response()
}
