use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Notify;
use uuid::Uuid;
use waymark::error::{AppError, Result};
use waymark::models::{BoundingBox, Coordinates, Marker, Poi, PoiCategory, SearchResult};
use waymark::services::nominatim::Geocoder;
use waymark::services::osrm::{DirectionsResponse, RoutingProvider};
use waymark::services::overpass::PoiSource;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[allow(dead_code)]
pub fn jakarta() -> Coordinates {
    Coordinates::new(-6.2088, 106.8456).unwrap()
}

#[allow(dead_code)]
pub fn bandung() -> Coordinates {
    Coordinates::new(-6.9175, 107.6191).unwrap()
}

/// Central Jakarta viewport
#[allow(dead_code)]
pub fn jakarta_bounds() -> BoundingBox {
    BoundingBox::new(-6.25, 106.78, -6.15, 106.88).unwrap()
}

#[allow(dead_code)]
pub fn create_test_marker(title: &str, description: &str, lat: f64, lng: f64) -> Marker {
    Marker {
        id: Uuid::new_v4(),
        coordinates: Coordinates::new(lat, lng).unwrap(),
        title: title.to_string(),
        description: description.to_string(),
        created_at: OffsetDateTime::now_utc(),
    }
}

#[allow(dead_code)]
pub fn create_test_poi(id: i64, title: &str, category: PoiCategory) -> Poi {
    Poi::new(
        id,
        Coordinates::new(-6.2 + id as f64 * 0.001, 106.8).unwrap(),
        title.to_string(),
        category,
    )
}

#[allow(dead_code)]
pub fn create_test_place(title: &str, lat: f64, lng: f64) -> SearchResult {
    SearchResult::Place {
        title: title.to_string(),
        coordinates: Coordinates::new(lat, lng).unwrap(),
    }
}

/// Check if we should skip real API tests
#[allow(dead_code)]
pub fn should_skip_real_api_tests() -> bool {
    std::env::var("SKIP_REAL_API_TESTS").is_ok()
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Distance and duration one mocked routing call answers with.
#[derive(Debug, Clone, Copy)]
pub struct Leg {
    pub distance_km: f64,
    pub duration_min: f64,
}

#[allow(dead_code)]
pub fn leg(distance_km: f64, duration_min: f64) -> Option<Leg> {
    Some(Leg {
        distance_km,
        duration_min,
    })
}

/// Answers two-waypoint requests with `direct` and three-waypoint requests
/// with `north` or `south` depending on which side of the midpoint the via
/// point lies. `None` means that request fails with a network error.
pub struct MockRoutingProvider {
    direct: Option<Leg>,
    north: Option<Leg>,
    south: Option<Leg>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockRoutingProvider {
    pub fn new(direct: Option<Leg>, north: Option<Leg>, south: Option<Leg>) -> Self {
        MockRoutingProvider {
            direct,
            north,
            south,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self::new(None, None, None)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoutingProvider for MockRoutingProvider {
    async fn route(&self, waypoints: &[Coordinates]) -> Result<DirectionsResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let leg = match waypoints.len() {
            2 => self.direct,
            3 => {
                let mid_lat = (waypoints[0].lat + waypoints[2].lat) / 2.0;
                if waypoints[1].lat > mid_lat {
                    self.north
                } else {
                    self.south
                }
            }
            n => {
                return Err(AppError::InvalidRequest(format!(
                    "unexpected {} waypoints",
                    n
                )))
            }
        };

        let leg = leg.ok_or_else(|| AppError::Network("connection refused".to_string()))?;

        Ok(DirectionsResponse {
            distance_meters: leg.distance_km * 1000.0,
            duration_seconds: leg.duration_min * 60.0,
            geometry: waypoints.iter().map(|c| [c.lng, c.lat]).collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// POIs
// ---------------------------------------------------------------------------

/// Configurable spatial-query source. Can fail with an HTTP status, sleep
/// before answering, or block until `release()` is called.
pub struct MockPoiSource {
    pois: Mutex<Vec<Poi>>,
    fail_status: Mutex<Option<u16>>,
    delay: Mutex<Option<Duration>>,
    gate: Option<Notify>,
    pub started: Notify,
    calls: AtomicUsize,
    last_categories: Mutex<Vec<PoiCategory>>,
}

#[allow(dead_code)]
impl MockPoiSource {
    pub fn returning(pois: Vec<Poi>) -> Self {
        MockPoiSource {
            pois: Mutex::new(pois),
            fail_status: Mutex::new(None),
            delay: Mutex::new(None),
            gate: None,
            started: Notify::new(),
            calls: AtomicUsize::new(0),
            last_categories: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        let source = Self::returning(Vec::new());
        source.set_failure(Some(status));
        source
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Notify::new());
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn set_pois(&self, pois: Vec<Poi>) {
        *self.pois.lock().unwrap() = pois;
    }

    pub fn set_failure(&self, status: Option<u16>) {
        *self.fail_status.lock().unwrap() = status;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_categories(&self) -> Vec<PoiCategory> {
        self.last_categories.lock().unwrap().clone()
    }
}

#[async_trait]
impl PoiSource for MockPoiSource {
    async fn fetch_pois(
        &self,
        _bounds: &BoundingBox,
        categories: &[PoiCategory],
    ) -> Result<Vec<Poi>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_categories.lock().unwrap() = categories.to_vec();
        self.started.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let fail_status = *self.fail_status.lock().unwrap();
        if let Some(status) = fail_status {
            return Err(AppError::from_status("mock overpass", status, ""));
        }

        Ok(self.pois.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// Geocoding
// ---------------------------------------------------------------------------

pub struct MockGeocoder {
    places: Vec<SearchResult>,
    fail: bool,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockGeocoder {
    pub fn returning(places: Vec<SearchResult>) -> Self {
        MockGeocoder {
            places,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        MockGeocoder {
            places: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn search_places(&self, _query: &str) -> Result<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Timeout("geocoder timed out".to_string()));
        }
        Ok(self.places.clone())
    }
}

/// Six places, one more than any lookup may return.
#[allow(dead_code)]
pub fn many_places() -> Vec<SearchResult> {
    (0..6)
        .map(|i| create_test_place(&format!("Bandung {}", i), -6.9 + i as f64 * 0.01, 107.6))
        .collect()
}

