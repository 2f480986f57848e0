use crate::models::{Coordinates, Marker, Poi, PoiCategory};
use serde::Serialize;
use uuid::Uuid;

/// One entry of a unified search. The variant is fixed where the source is
/// read; nothing downstream inspects shape to tell sources apart.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchResult {
    Marker {
        id: Uuid,
        title: String,
        description: String,
        coordinates: Coordinates,
    },
    Poi {
        id: i64,
        title: String,
        category: PoiCategory,
        coordinates: Coordinates,
    },
    /// Geocoder hit. Carries no description.
    Place {
        title: String,
        coordinates: Coordinates,
    },
}

impl SearchResult {
    pub fn title(&self) -> &str {
        match self {
            SearchResult::Marker { title, .. }
            | SearchResult::Poi { title, .. }
            | SearchResult::Place { title, .. } => title,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        match self {
            SearchResult::Marker { coordinates, .. }
            | SearchResult::Poi { coordinates, .. }
            | SearchResult::Place { coordinates, .. } => *coordinates,
        }
    }

    pub fn marker_id(&self) -> Option<Uuid> {
        match self {
            SearchResult::Marker { id, .. } => Some(*id),
            _ => None,
        }
    }
}

impl From<&Marker> for SearchResult {
    fn from(marker: &Marker) -> Self {
        SearchResult::Marker {
            id: marker.id,
            title: marker.title.clone(),
            description: marker.description.clone(),
            coordinates: marker.coordinates,
        }
    }
}

impl From<&Poi> for SearchResult {
    fn from(poi: &Poi) -> Self {
        SearchResult::Poi {
            id: poi.id,
            title: poi.title.clone(),
            category: poi.category,
            coordinates: poi.coordinates,
        }
    }
}
