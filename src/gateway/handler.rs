use std::time::Instant;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::gateway::error::GatewayError;
use crate::gateway::state::AppState;
use crate::geo;
use crate::search::{DEFAULT_TOP_K, Recommendation};

/// Search request body.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Search response body.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub restaurants: Vec<Recommendation>,
    pub query: String,
    pub total_matches: usize,
    /// Wall-clock seconds spent serving this request.
    pub processing_time: f64,
}

/// Neighborhood lookup response body.
#[derive(Debug, Serialize)]
pub struct NeighborhoodResponse {
    pub neighborhood: Option<&'static str>,
    pub zipcode: String,
    pub found: bool,
}

#[instrument(skip(state, request), fields(query = %request.query))]
pub async fn search_restaurants_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, GatewayError> {
    if request.query.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "query must not be empty".to_string(),
        ));
    }
    if request.top_k == 0 {
        return Err(GatewayError::InvalidRequest(
            "top_k must be at least 1".to_string(),
        ));
    }

    let start = Instant::now();

    let restaurants = state
        .pipeline
        .rank(
            &request.query,
            request.neighborhood.as_deref(),
            request.top_k,
        )
        .await;

    let processing_time = start.elapsed().as_secs_f64();
    info!(
        total_matches = restaurants.len(),
        processing_time, "Search complete"
    );

    Ok(Json(SearchResponse {
        total_matches: restaurants.len(),
        restaurants,
        query: request.query,
        processing_time,
    }))
}

#[instrument]
pub async fn neighborhood_by_zipcode_handler(
    Path(zipcode): Path<String>,
) -> Json<NeighborhoodResponse> {
    let zipcode = zipcode.trim().to_string();
    let neighborhood = geo::neighborhood_for_zipcode(geo::parse_zipcode(&zipcode));

    Json(NeighborhoodResponse {
        neighborhood,
        found: neighborhood.is_some(),
        zipcode,
    })
}
