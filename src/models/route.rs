use crate::constants::BEST_ROUTE_NAME;
use crate::models::{Coordinates, TransportEstimate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    /// Ordered path, at least two points
    pub path: Vec<Coordinates>,
    pub distance_km: f64,
    pub duration_min: f64,
    pub is_best: bool,
    pub name: String,
}

impl Route {
    pub fn best(path: Vec<Coordinates>, distance_km: f64, duration_min: f64) -> Self {
        Route {
            path,
            distance_km,
            duration_min,
            is_best: true,
            name: BEST_ROUTE_NAME.to_string(),
        }
    }

    pub fn alternative(
        index: usize,
        path: Vec<Coordinates>,
        distance_km: f64,
        duration_min: f64,
    ) -> Self {
        Route {
            path,
            distance_km,
            duration_min,
            is_best: false,
            name: format!("alternative route {}", index),
        }
    }

    /// Straight line between the endpoints, used when routing is unavailable.
    pub fn straight_line(origin: Coordinates, destination: Coordinates) -> Self {
        Route::best(vec![origin, destination], origin.distance_to(&destination), 0.0)
    }

    /// Minutes this route takes beyond `best`, never negative.
    pub fn extra_minutes_over(&self, best: &Route) -> f64 {
        (self.duration_min - best.duration_min).max(0.0)
    }
}

/// Outcome of one route computation between two points.
///
/// `routes` is never empty; `routes[0]` is the best route and every other
/// entry is strictly slower.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub routes: Vec<Route>,
    /// Estimates derived from the best route's distance
    pub modes: Vec<TransportEstimate>,
    /// True when the routing service was unreachable and `routes` holds the
    /// straight-line fallback.
    pub fallback: bool,
}

impl RoutePlan {
    pub fn best(&self) -> &Route {
        &self.routes[0]
    }

    pub fn distance_km(&self) -> f64 {
        self.best().distance_km
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
}

impl RouteRequest {
    pub fn validate(&self) -> Result<(), String> {
        Coordinates::new(self.origin.lat, self.origin.lng)?;
        Coordinates::new(self.destination.lat, self.destination.lng)?;
        Ok(())
    }
}

/// Render a route duration: "45 min", "1h 30min", "2h".
pub fn format_minutes(minutes: f64) -> String {
    // Round before splitting so 59.7 min carries into "1h"
    let total = minutes.round().max(0.0) as i64;
    if total < 60 {
        return format!("{} min", total);
    }
    let (hours, mins) = (total / 60, total % 60);
    if mins > 0 {
        format!("{}h {}min", hours, mins)
    } else {
        format!("{}h", hours)
    }
}

/// Render a transport estimate: "45 min", "1h 30min", "2d 3h".
pub fn format_hours(hours: f64) -> String {
    if (hours * 60.0).round() < 24.0 * 60.0 {
        return format_minutes(hours * 60.0);
    }
    let total = hours.round() as i64;
    let (days, h) = (total / 24, total % 24);
    if h > 0 {
        format!("{}d {}h", days, h)
    } else {
        format!("{}d", days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_route() {
        let origin = Coordinates::new(-6.20, 106.82).unwrap();
        let destination = Coordinates::new(-6.90, 107.62).unwrap();

        let route = Route::straight_line(origin, destination);
        assert_eq!(route.path, vec![origin, destination]);
        assert_eq!(route.duration_min, 0.0);
        assert_eq!(route.distance_km, origin.distance_to(&destination));
        assert!(route.is_best);
        assert_eq!(route.name, BEST_ROUTE_NAME);
    }

    #[test]
    fn extra_minutes() {
        let best = Route::best(vec![], 10.0, 20.0);
        let alt = Route::alternative(1, vec![], 12.0, 27.5);
        assert_eq!(alt.extra_minutes_over(&best), 7.5);
        assert_eq!(best.extra_minutes_over(&alt), 0.0);
    }

    #[test]
    fn minute_formatting() {
        assert_eq!(format_minutes(45.2), "45 min");
        assert_eq!(format_minutes(90.0), "1h 30min");
        assert_eq!(format_minutes(120.0), "2h");
        assert_eq!(format_minutes(119.8), "2h");
        assert_eq!(format_minutes(59.7), "1h");
        assert_eq!(format_minutes(59.4), "59 min");
    }

    #[test]
    fn hour_formatting() {
        assert_eq!(format_hours(0.75), "45 min");
        assert_eq!(format_hours(1.5), "1h 30min");
        assert_eq!(format_hours(51.0), "2d 3h");
        assert_eq!(format_hours(48.0), "2d");
        assert_eq!(format_hours(0.999), "1h");
        assert_eq!(format_hours(47.9), "2d");
        assert_eq!(format_hours(23.995), "1d");
        assert_eq!(format_hours(23.99), "23h 59min");
        assert_eq!(format_hours(23.5), "23h 30min");
    }
}
