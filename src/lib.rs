// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

// Re-export commonly used types
pub use error::{AppError, Result};

use db::MarkerRepository;
use services::poi_sessions::PoiSessions;
use services::route_planner::RoutePlanner;
use services::search_index::LocationSearchIndex;
use std::sync::Arc;

// App state for sharing across the application
pub struct AppState {
    pub markers: Arc<dyn MarkerRepository>,
    pub planner: Arc<RoutePlanner>,
    /// POI caches, one per map session
    pub pois: Arc<PoiSessions>,
    pub search: Arc<LocationSearchIndex>,
}
