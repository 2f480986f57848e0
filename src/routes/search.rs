use crate::error::Result;
use crate::models::SearchResult;
use crate::routes::session_id;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub count: usize,
}

/// GET /search?q= - markers and the session's cached POIs first, then
/// geocoder places
pub async fn search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Ok(Json(SearchResponse {
            query,
            results: Vec::new(),
            count: 0,
        }));
    }

    let markers = state.markers.list().await?;
    let pois = match session_id(&headers) {
        Some(id) => match state.pois.get(id).await {
            Some(aggregator) => aggregator.pois(),
            None => Arc::default(),
        },
        None => Arc::default(),
    };
    let results = state.search.search(&query, &markers, &pois).await;
    let count = results.len();

    tracing::debug!("Search '{}' returned {} result(s)", query, count);

    Ok(Json(SearchResponse {
        query,
        results,
        count,
    }))
}
