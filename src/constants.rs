//! Stable application-wide constants.
//!
//! Values here are algorithm coefficients, service endpoints, and default
//! fallbacks for env-var-based configuration. Anything an operator may want to
//! tune at runtime is surfaced through [`Config`](crate::config::Config).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: u16 = 3000;

// --- External service defaults ---

/// Public OSRM demo server. Overridden by `OSRM_BASE_URL`.
pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";
/// Overridden by `OVERPASS_URL`.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
/// Overridden by `NOMINATIM_URL`.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
/// Nominatim's usage policy requires an identifying User-Agent.
pub const DEFAULT_USER_AGENT: &str = concat!("waymark/", env!("CARGO_PKG_VERSION"));

/// Default timeout for a single routing request.
pub const DEFAULT_ROUTING_TIMEOUT_SECONDS: u64 = 15;
/// Hard client-side deadline for one POI fetch.
pub const DEFAULT_POI_FETCH_TIMEOUT_SECONDS: u64 = 10;
/// Default geocoder lookup cache TTL: 1 hour. Overridden by `GEOCODE_CACHE_TTL`.
pub const DEFAULT_GEOCODE_CACHE_TTL_SECONDS: u64 = 3_600;
/// Maximum distinct queries held by the geocoder lookup cache.
pub const GEOCODE_CACHE_MAX_ENTRIES: u64 = 500;

// --- Route planning ---

/// Latitude offset (degrees) of the synthetic midpoint waypoint used for
/// alternative routes. Applied once northwards and once southwards.
///
/// Fixed heuristic: it does not scale with route length or latitude.
pub const ALTERNATIVE_WAYPOINT_OFFSET_DEG: f64 = 0.05;
/// An alternative is kept only if its duration exceeds the best route's
/// duration by more than this factor.
pub const ALTERNATIVE_ADMISSION_FACTOR: f64 = 1.05;
/// Best routes shorter than this (km) are returned without alternatives.
pub const SHORT_ROUTE_THRESHOLD_KM: f64 = 2.0;
/// Display name of the index-0 route.
pub const BEST_ROUTE_NAME: &str = "best route";

/// Mean Earth radius used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// --- POI loading ---

/// Below this zoom no POIs are shown and the cache is cleared.
pub const POI_MIN_ZOOM: f64 = 11.0;
/// From this zoom schools are added.
pub const POI_SCHOOL_ZOOM: f64 = 13.0;
/// From this zoom everyday amenities are added.
pub const POI_AMENITY_ZOOM: f64 = 15.0;
/// Overpass server-side query timeout, mirrors the client deadline.
pub const OVERPASS_QUERY_TIMEOUT_SECONDS: u64 = 10;
/// Name given to elements that carry no `name` tag.
pub const UNNAMED_POI_TITLE: &str = "Unnamed";

/// Request header naming the map session a viewport or search belongs to.
pub const SESSION_HEADER: &str = "x-session-id";
/// A map session's POI cache is dropped after this long without a request.
pub const POI_SESSION_IDLE_SECONDS: u64 = 1_800;
/// Maximum concurrently tracked map sessions.
pub const POI_SESSION_MAX_ENTRIES: u64 = 10_000;

pub const HTTP_TOO_MANY_REQUESTS: u16 = 429;
pub const HTTP_GATEWAY_TIMEOUT: u16 = 504;

// --- Search ---

/// Cap on local (marker + POI) results and on geocoder results.
pub const SEARCH_RESULT_LIMIT: usize = 5;
