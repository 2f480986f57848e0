pub mod nominatim;
pub mod osrm;
pub mod overpass;
pub mod poi_aggregator;
pub mod poi_sessions;
pub mod route_planner;
pub mod search_index;
pub mod transport;
