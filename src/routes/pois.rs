use crate::error::{AppError, Result};
use crate::models::{BoundingBox, Poi, PoiCategory};
use crate::services::poi_aggregator::PoiLoadOutcome;
use crate::routes::session_id;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Query parameters for a viewport change
#[derive(Debug, Deserialize)]
pub struct PoiViewportParams {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
    /// Map zoom level (0-22)
    pub zoom: f64,
    /// Comma-separated display filter; never widens what is fetched
    #[serde(default)]
    pub categories: Option<String>,
}

impl PoiViewportParams {
    pub fn validate(&self) -> Result<BoundingBox> {
        if !(0.0..=22.0).contains(&self.zoom) {
            return Err(AppError::InvalidRequest(
                "zoom must be between 0 and 22".to_string(),
            ));
        }

        BoundingBox::new(self.south, self.west, self.north, self.east)
            .map_err(AppError::InvalidRequest)
    }

    /// Parse categories from comma-separated string
    pub fn parse_categories(&self) -> Result<Option<HashSet<PoiCategory>>> {
        match &self.categories {
            None => Ok(None),
            Some(cats_str) if cats_str.trim().is_empty() => Ok(None),
            Some(cats_str) => {
                let categories: std::result::Result<HashSet<PoiCategory>, _> = cats_str
                    .split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| s.parse::<PoiCategory>())
                    .collect();

                match categories {
                    Ok(cats) if cats.is_empty() => Ok(None),
                    Ok(cats) => Ok(Some(cats)),
                    Err(e) => Err(AppError::InvalidRequest(e)),
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PoiResponse {
    pub pois: Vec<Poi>,
    pub count: usize,
    /// What the viewport change did to the cache
    pub load: PoiLoadOutcome,
    /// Categories fetched at this zoom
    pub visible_categories: Vec<PoiCategory>,
}

/// GET /pois - Report a viewport change and return the filtered cache
///
/// The cache belongs to the session named by the `x-session-id` header.
/// Without one the request gets a throwaway cache of its own.
pub async fn viewport_pois(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<PoiViewportParams>,
) -> Result<Json<PoiResponse>> {
    let bounds = params.validate()?;
    let selected = params.parse_categories()?;

    let session = session_id(&headers);

    tracing::info!(
        "POI viewport: session={:?}, bbox={}, zoom={}, filter={:?}",
        session,
        bounds.to_overpass(),
        params.zoom,
        selected
    );

    let aggregator = match session {
        Some(id) => state.pois.get_or_create(id).await,
        None => Arc::new(state.pois.detached()),
    };

    let load = aggregator.on_viewport_changed(bounds, params.zoom).await;
    let pois = aggregator.filter_cached(selected.as_ref());
    let count = pois.len();

    Ok(Json(PoiResponse {
        pois,
        count,
        load,
        visible_categories: aggregator.visible_categories(params.zoom),
    }))
}

/// DELETE /sessions/{id} - Close a map session and drop its POI cache
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.pois.end(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {} not found", id)))
    }
}
