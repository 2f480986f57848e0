use crate::error::{AppError, Result};
use crate::models::{RoutePlan, RouteRequest};
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /routes - best route, admitted alternatives and transport estimates.
/// A routing outage still answers 200 with `fallback: true`.
pub async fn plan_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RoutePlan>> {
    request.validate().map_err(AppError::InvalidRequest)?;

    let plan = state
        .planner
        .compute_route(request.origin, request.destination)
        .await;

    if plan.fallback {
        tracing::warn!("Serving straight-line fallback route");
    }

    Ok(Json(plan))
}
