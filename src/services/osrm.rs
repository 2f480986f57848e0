use crate::error::{AppError, Result};
use crate::models::Coordinates;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Source of driving routes through an ordered list of waypoints.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn route(&self, waypoints: &[Coordinates]) -> Result<DirectionsResponse>;
}

#[derive(Clone)]
pub struct OsrmClient {
    client: Client,
    base_url: String,
    profile: String,
}

impl OsrmClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(OsrmClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            profile: "driving".to_string(),
        })
    }

    fn route_url(&self, waypoints: &[Coordinates]) -> String {
        // Format coordinates as "lng,lat;lng,lat;..."
        let coordinates_str = waypoints
            .iter()
            .map(|c| format!("{},{}", c.lng, c.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}",
            self.base_url, self.profile, coordinates_str
        )
    }
}

#[async_trait]
impl RoutingProvider for OsrmClient {
    /// Returns the first route with full geometry, distance, and duration
    async fn route(&self, waypoints: &[Coordinates]) -> Result<DirectionsResponse> {
        if waypoints.len() < 2 {
            return Err(AppError::InvalidRequest(
                "At least 2 waypoints required".to_string(),
            ));
        }

        let url = self.route_url(waypoints);

        tracing::debug!(
            waypoints = waypoints.len(),
            "OSRM request: {} waypoints",
            waypoints.len()
        );

        let response = self
            .client
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await
            .map_err(|e| AppError::from_reqwest("OSRM request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, "OSRM HTTP error {}: {}", status, error_text);
            return Err(AppError::from_status("OSRM", status.as_u16(), &error_text));
        }

        let directions: OsrmRouteResponse = response
            .json()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Failed to parse response: {}", e)))?;

        directions.into_first_route()
    }
}

// OSRM API response types

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

impl OsrmRouteResponse {
    /// A non-"Ok" code or an empty route list counts as failure.
    pub(crate) fn into_first_route(self) -> Result<DirectionsResponse> {
        if self.code != "Ok" {
            return Err(AppError::RoutingApi(format!(
                "OSRM returned {}: {}",
                self.code,
                self.message.unwrap_or_default()
            )));
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| AppError::RoutingApi("No routes found".to_string()))?;

        tracing::debug!(
            distance_km = %format!("{:.2}", route.distance / 1000.0),
            duration_min = %format!("{:.0}", route.duration / 60.0),
            path_points = route.geometry.coordinates.len(),
            "OSRM response: {:.2}km, {:.0}min",
            route.distance / 1000.0, route.duration / 60.0
        );

        Ok(DirectionsResponse {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            geometry: route.geometry.coordinates,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64, // meters
    duration: f64, // seconds
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>, // [lng, lat] pairs
}

// Our simplified response type

#[derive(Debug, Clone, Serialize)]
pub struct DirectionsResponse {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// GeoJSON coordinates as [lng, lat] pairs
    pub geometry: Vec<[f64; 2]>,
}

impl DirectionsResponse {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds / 60.0
    }

    /// Convert GeoJSON [lng, lat] pairs to our (lat, lng) Coordinates
    pub fn to_coordinates(&self) -> Vec<Coordinates> {
        self.geometry
            .iter()
            .filter_map(|coord| Coordinates::new(coord[1], coord[0]).ok())
            .collect()
    }
}
