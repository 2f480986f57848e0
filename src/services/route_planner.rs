use crate::constants::*;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, Route, RoutePlan};
use crate::services::osrm::RoutingProvider;
use crate::services::transport::TransportModeEstimator;
use std::sync::Arc;

/// Computes a best route plus slower alternatives between two points.
///
/// The direct request always resolves first: both the admission rule and the
/// short-route collapse compare against its values. The two alternative
/// requests then run concurrently and fail independently.
pub struct RoutePlanner {
    provider: Arc<dyn RoutingProvider>,
    estimator: TransportModeEstimator,
}

impl RoutePlanner {
    pub fn new(provider: Arc<dyn RoutingProvider>, estimator: TransportModeEstimator) -> Self {
        RoutePlanner {
            provider,
            estimator,
        }
    }

    /// Never fails: an unreachable routing service degrades to a straight line.
    pub async fn compute_route(&self, origin: Coordinates, destination: Coordinates) -> RoutePlan {
        tracing::info!(
            "Computing route ({:.4}, {:.4}) -> ({:.4}, {:.4})",
            origin.lat,
            origin.lng,
            destination.lat,
            destination.lng
        );

        let best = match self.request_route(&[origin, destination]).await {
            Ok((path, distance_km, duration_min)) => Route::best(path, distance_km, duration_min),
            Err(e) => {
                tracing::warn!("Direct route failed ({}), using straight-line fallback", e);
                let fallback = Route::straight_line(origin, destination);
                return self.plan(origin, destination, vec![fallback], true);
            }
        };

        if best.distance_km < SHORT_ROUTE_THRESHOLD_KM {
            tracing::debug!(
                "Best route is {:.2}km, below {}km; skipping alternatives",
                best.distance_km,
                SHORT_ROUTE_THRESHOLD_KM
            );
            return self.plan(origin, destination, vec![best], false);
        }

        let mid = origin.midpoint(&destination);
        let via_north = mid.offset_lat(ALTERNATIVE_WAYPOINT_OFFSET_DEG);
        let via_south = mid.offset_lat(-ALTERNATIVE_WAYPOINT_OFFSET_DEG);
        let (north, south) = futures::future::join(
            self.alternative(1, origin, via_north, destination),
            self.alternative(2, origin, via_south, destination),
        )
        .await;

        let candidates: Vec<Route> = [north, south].into_iter().flatten().collect();
        let mut routes = vec![best];
        let admitted = admit_alternatives(&routes[0], candidates);
        routes.extend(admitted);

        tracing::info!("Generated {} route(s)", routes.len());
        for route in &routes {
            tracing::debug!(
                "{}: {:.1} min, {:.1} km",
                route.name,
                route.duration_min,
                route.distance_km
            );
        }

        self.plan(origin, destination, routes, false)
    }

    fn plan(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        routes: Vec<Route>,
        fallback: bool,
    ) -> RoutePlan {
        let modes = self.estimator.estimate_modes(routes[0].distance_km);
        RoutePlan {
            origin,
            destination,
            routes,
            modes,
            fallback,
        }
    }

    /// One alternative through a single synthetic waypoint. Errors are logged
    /// and swallowed.
    async fn alternative(
        &self,
        index: usize,
        origin: Coordinates,
        via: Coordinates,
        destination: Coordinates,
    ) -> Option<Route> {
        match self.request_route(&[origin, via, destination]).await {
            Ok((path, distance_km, duration_min)) => {
                Some(Route::alternative(index, path, distance_km, duration_min))
            }
            Err(e) => {
                tracing::warn!("Alternative route {} failed: {}", index, e);
                None
            }
        }
    }

    /// Returns (path, distance km, duration minutes).
    async fn request_route(
        &self,
        waypoints: &[Coordinates],
    ) -> Result<(Vec<Coordinates>, f64, f64)> {
        let directions = self.provider.route(waypoints).await?;
        let path = directions.to_coordinates();
        if path.len() < 2 {
            return Err(AppError::RoutingApi(format!(
                "Route geometry has {} valid point(s)",
                path.len()
            )));
        }
        Ok((path, directions.distance_km(), directions.duration_minutes()))
    }
}

/// Keep, in order, the candidates that are more than 5% slower than `best`.
pub fn admit_alternatives(best: &Route, candidates: Vec<Route>) -> Vec<Route> {
    let threshold = best.duration_min * ALTERNATIVE_ADMISSION_FACTOR;
    candidates
        .into_iter()
        .filter(|candidate| {
            let admitted = candidate.duration_min > threshold;
            if !admitted {
                tracing::debug!(
                    "Dropping {} ({:.1} min): within 5% of best ({:.1} min)",
                    candidate.name,
                    candidate.duration_min,
                    best.duration_min
                );
            }
            admitted
        })
        .collect()
}
