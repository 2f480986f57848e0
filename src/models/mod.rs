pub mod bounds;
pub mod coordinates;
pub mod marker;
pub mod poi;
pub mod route;
pub mod search;
pub mod transport;

pub use bounds::BoundingBox;
pub use coordinates::Coordinates;
pub use marker::{Marker, MarkerUpdate, NewMarker};
pub use poi::{Poi, PoiCategory};
pub use route::{Route, RoutePlan, RouteRequest};
pub use search::SearchResult;
pub use transport::{TransportEstimate, TravelMode};
