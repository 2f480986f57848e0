use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Check if services are working
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    // Check marker store
    let backend = state.markers.backend_name();
    if state.markers.health_check().await {
        status["checks"]["markers"] = json!({"backend": backend, "status": "ok"});
    } else {
        status["checks"]["markers"] = json!({"backend": backend, "status": "unreachable"});
        status["status"] = json!("error");
    }

    // Map sessions holding a POI cache
    status["checks"]["poi_sessions"] = json!({
        "active": state.pois.active_sessions(),
    });

    Json(status)
}
