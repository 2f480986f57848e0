use crate::db::MarkerRepository;
use crate::error::{AppError, Result};
use crate::models::{
    BoundingBox, Coordinates, Marker, Poi, PoiCategory, Route, RoutePlan, SearchResult,
};
use crate::services::poi_aggregator::{PoiAggregator, PoiLoadOutcome};
use crate::services::route_planner::RoutePlanner;
use crate::services::search_index::{resolve_marker, LocationSearchIndex};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// State of one open map view: the selected route pair, the active route
/// plan, the marker snapshot used for search, and the POI cache.
///
/// Created when a view opens and dropped when it closes. Every mutation
/// happens through `&mut self` after the awaited step it depends on, so
/// there is a single writer.
pub struct MapSession {
    planner: Arc<RoutePlanner>,
    pois: Arc<PoiAggregator>,
    search_index: Arc<LocationSearchIndex>,
    marker_repo: Arc<dyn MarkerRepository>,
    markers: Vec<Marker>,
    selected_points: Vec<Coordinates>,
    plan: Option<RoutePlan>,
    selected_route: usize,
    highlighted_marker: Option<Uuid>,
}

impl MapSession {
    pub fn new(
        planner: Arc<RoutePlanner>,
        pois: Arc<PoiAggregator>,
        search_index: Arc<LocationSearchIndex>,
        marker_repo: Arc<dyn MarkerRepository>,
    ) -> Self {
        MapSession {
            planner,
            pois,
            search_index,
            marker_repo,
            markers: Vec::new(),
            selected_points: Vec::with_capacity(2),
            plan: None,
            selected_route: 0,
            highlighted_marker: None,
        }
    }

    /// Reload the marker snapshot from the store.
    pub async fn refresh_markers(&mut self) -> Result<&[Marker]> {
        self.markers = self.marker_repo.list().await?;
        if let Some(id) = self.highlighted_marker {
            if !self.markers.iter().any(|m| m.id == id) {
                self.highlighted_marker = None;
            }
        }
        Ok(&self.markers)
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Record a route endpoint. The second point of a pair computes the
    /// route; a third starts a new pair and drops the previous plan.
    pub async fn on_point_selected(&mut self, point: Coordinates) -> Option<&RoutePlan> {
        if self.selected_points.len() >= 2 {
            self.clear_route();
        }
        self.selected_points.push(point);

        if self.selected_points.len() < 2 {
            tracing::debug!("Route origin selected: ({:.4}, {:.4})", point.lat, point.lng);
            return None;
        }

        let origin = self.selected_points[0];
        let plan = self.planner.compute_route(origin, point).await;
        self.selected_route = 0;
        self.plan = Some(plan);
        self.plan.as_ref()
    }

    pub fn selected_points(&self) -> &[Coordinates] {
        &self.selected_points
    }

    pub fn plan(&self) -> Option<&RoutePlan> {
        self.plan.as_ref()
    }

    /// Highlight route `index` of the active plan.
    pub fn select_route(&mut self, index: usize) -> Result<&Route> {
        let plan = self
            .plan
            .as_ref()
            .ok_or_else(|| AppError::InvalidRequest("No active route".to_string()))?;
        let route = plan.routes.get(index).ok_or_else(|| {
            AppError::InvalidRequest(format!(
                "Route index {} out of range (0..{})",
                index,
                plan.routes.len()
            ))
        })?;
        self.selected_route = index;
        Ok(route)
    }

    pub fn selected_route(&self) -> Option<&Route> {
        self.plan
            .as_ref()
            .and_then(|plan| plan.routes.get(self.selected_route))
    }

    pub fn clear_route(&mut self) {
        self.selected_points.clear();
        self.plan = None;
        self.selected_route = 0;
    }

    pub async fn on_viewport_changed(&self, bounds: BoundingBox, zoom: f64) -> PoiLoadOutcome {
        self.pois.on_viewport_changed(bounds, zoom).await
    }

    pub fn visible_pois(&self, selected: Option<&HashSet<PoiCategory>>) -> Vec<Poi> {
        self.pois.filter_cached(selected)
    }

    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let pois = self.pois.pois();
        self.search_index.search(query, &self.markers, &pois).await
    }

    /// Focus a search result. Marker results resolve back to their marker,
    /// which becomes the highlighted one.
    pub fn select_result(&mut self, result: &SearchResult) -> Option<&Marker> {
        let marker = resolve_marker(result, &self.markers)?;
        self.highlighted_marker = Some(marker.id);
        Some(marker)
    }

    pub fn highlighted_marker(&self) -> Option<&Marker> {
        let id = self.highlighted_marker?;
        self.markers.iter().find(|m| m.id == id)
    }
}
