use crate::error::Result;
use crate::models::{Marker, MarkerUpdate, NewMarker};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// GET /markers
pub async fn list_markers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Marker>>> {
    let markers = state.markers.list().await?;
    Ok(Json(markers))
}

/// POST /markers
pub async fn create_marker(
    State(state): State<Arc<AppState>>,
    Json(new_marker): Json<NewMarker>,
) -> Result<(StatusCode, Json<Marker>)> {
    let marker = state.markers.create(new_marker).await?;
    tracing::info!("Marker {} created: '{}'", marker.id, marker.title);
    Ok((StatusCode::CREATED, Json(marker)))
}

/// PUT /markers/{id} - title and description only
pub async fn update_marker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<MarkerUpdate>,
) -> Result<Json<Marker>> {
    let marker = state.markers.update(id, update).await?;
    Ok(Json(marker))
}

/// DELETE /markers/{id}
pub async fn delete_marker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.markers.delete(id).await?;
    tracing::info!("Marker {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
