use crate::constants::SEARCH_RESULT_LIMIT;
use crate::error::Result;
use crate::models::{Marker, Poi, SearchResult};
use crate::services::nominatim::Geocoder;
use std::sync::Arc;

/// Unified text search over markers, the POI cache and the geocoder.
pub struct LocationSearchIndex {
    geocoder: Arc<dyn Geocoder>,
}

impl LocationSearchIndex {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        LocationSearchIndex { geocoder }
    }

    /// Case-insensitive substring match. Markers match on title or
    /// description, POIs on title. Markers come first; the cap applies to
    /// the combined list.
    pub fn search_local(
        &self,
        query: &str,
        markers: &[Marker],
        pois: &[Poi],
    ) -> Vec<SearchResult> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let marker_hits = markers
            .iter()
            .filter(|m| {
                m.title.to_lowercase().contains(&needle)
                    || m.description.to_lowercase().contains(&needle)
            })
            .map(SearchResult::from);

        let poi_hits = pois
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .map(SearchResult::from);

        marker_hits
            .chain(poi_hits)
            .take(SEARCH_RESULT_LIMIT)
            .collect()
    }

    /// External place lookup, at most five results.
    pub async fn search_places(&self, query: &str) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut places = self.geocoder.search_places(query).await?;
        places.truncate(SEARCH_RESULT_LIMIT);
        Ok(places)
    }

    /// Local results followed by place results. A geocoder failure only
    /// drops the place half.
    pub async fn search(
        &self,
        query: &str,
        markers: &[Marker],
        pois: &[Poi],
    ) -> Vec<SearchResult> {
        let mut results = self.search_local(query, markers, pois);
        if query.trim().is_empty() {
            return results;
        }

        match self.search_places(query).await {
            Ok(places) => results.extend(places),
            Err(e) => tracing::warn!("Place lookup for '{}' failed: {}", query, e),
        }

        results
    }
}

/// The marker a marker-variant result was built from, matched by id.
pub fn resolve_marker<'a>(result: &SearchResult, markers: &'a [Marker]) -> Option<&'a Marker> {
    let id = result.marker_id()?;
    markers.iter().find(|m| m.id == id)
}
