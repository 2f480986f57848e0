pub mod debug;
pub mod markers;
pub mod pois;
pub mod route_plan;
pub mod search;

use axum::{
    http::HeaderMap,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::constants::SESSION_HEADER;
use crate::AppState;

/// Map session named by the request, if any.
pub(crate) fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/markers",
            get(markers::list_markers).post(markers::create_marker),
        )
        .route(
            "/markers/{id}",
            put(markers::update_marker).delete(markers::delete_marker),
        )
        .route("/routes", post(route_plan::plan_route))
        .route("/pois", get(pois::viewport_pois))
        .route("/sessions/{id}", delete(pois::end_session))
        .route("/search", get(search::search))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
