use crate::constants::*;
use crate::error::{AppError, Result};
use crate::models::{BoundingBox, Coordinates, Poi, PoiCategory};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Spatial query returning POIs of the given categories inside a box.
#[async_trait]
pub trait PoiSource: Send + Sync {
    async fn fetch_pois(
        &self,
        bounds: &BoundingBox,
        categories: &[PoiCategory],
    ) -> Result<Vec<Poi>>;
}

/// Fixed category → OSM tag mapping used both to build queries and to
/// classify returned elements.
pub fn category_to_osm_tag(category: PoiCategory) -> Option<(&'static str, &'static str)> {
    match category {
        PoiCategory::Hospital => Some(("amenity", "hospital")),
        PoiCategory::University => Some(("amenity", "university")),
        PoiCategory::School => Some(("amenity", "school")),
        PoiCategory::Supermarket => Some(("shop", "supermarket")),
        PoiCategory::Restaurant => Some(("amenity", "restaurant")),
        PoiCategory::Bank => Some(("amenity", "bank")),
        PoiCategory::Fuel => Some(("amenity", "fuel")),
        PoiCategory::Hotel => Some(("tourism", "hotel")),
        PoiCategory::Worship => Some(("amenity", "place_of_worship")),
        PoiCategory::Other => None,
    }
}

/// First mapped category whose tag the element carries, else `Other`.
pub fn resolve_category(tags: &HashMap<String, String>) -> PoiCategory {
    PoiCategory::QUERYABLE
        .into_iter()
        .find(|category| {
            category_to_osm_tag(*category)
                .map(|(key, value)| tags.get(key).map(String::as_str) == Some(value))
                .unwrap_or(false)
        })
        .unwrap_or(PoiCategory::Other)
}

#[derive(Clone)]
pub struct OverpassClient {
    client: Client,
    endpoint: String,
}

impl OverpassClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(OverpassClient { client, endpoint })
    }

    /// Union of node/way filters for each category over one bbox.
    pub fn build_query(&self, bounds: &BoundingBox, categories: &[PoiCategory]) -> String {
        let bbox = bounds.to_overpass();
        let mut query_parts = vec![format!(
            "[out:json][timeout:{}];\n(",
            OVERPASS_QUERY_TIMEOUT_SECONDS
        )];

        for (key, value) in categories.iter().filter_map(|c| category_to_osm_tag(*c)) {
            query_parts.push(format!(r#"  node["{}"="{}"]({});"#, key, value, bbox));
            query_parts.push(format!(r#"  way["{}"="{}"]({});"#, key, value, bbox));
        }

        query_parts.push(");\nout center;".to_string());
        query_parts.join("\n")
    }

    fn convert_elements_to_pois(elements: Vec<OverpassElement>) -> Vec<Poi> {
        elements
            .into_iter()
            .filter_map(|elem| {
                // Nodes carry lat/lon; ways only a computed center
                let (lat, lon) = match (elem.lat, elem.lon, elem.center) {
                    (Some(lat), Some(lon), _) => (lat, lon),
                    (_, _, Some(center)) => (center.lat, center.lon),
                    _ => return None,
                };

                let coordinates = Coordinates::new(lat, lon).ok()?;
                let title = elem
                    .tags
                    .get("name")
                    .cloned()
                    .unwrap_or_else(|| UNNAMED_POI_TITLE.to_string());
                let category = resolve_category(&elem.tags);

                Some(Poi::new(elem.id, coordinates, title, category))
            })
            .collect()
    }
}

#[async_trait]
impl PoiSource for OverpassClient {
    async fn fetch_pois(
        &self,
        bounds: &BoundingBox,
        categories: &[PoiCategory],
    ) -> Result<Vec<Poi>> {
        let query = self.build_query(bounds, categories);
        tracing::debug!("Overpass query: {}", query);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(format!("data={}", urlencoding::encode(&query)))
            .send()
            .await
            .map_err(|e| AppError::from_reqwest("Overpass request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::from_status("Overpass", status.as_u16(), &error_text));
        }

        let api_response: OverpassResponse = response
            .json()
            .await
            .map_err(|e| AppError::OverpassApi(format!("Failed to parse response: {}", e)))?;

        Ok(Self::convert_elements_to_pois(api_response.elements))
    }
}

// Overpass API response types

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: i64,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OverpassClient {
        OverpassClient::new(DEFAULT_OVERPASS_URL.to_string(), Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_build_query() {
        let bounds = BoundingBox::new(-6.3, 106.7, -6.1, 106.9).unwrap();
        let query =
            client().build_query(&bounds, &[PoiCategory::Hospital, PoiCategory::Supermarket]);

        assert!(query.starts_with("[out:json][timeout:10];"));
        assert!(query.contains(r#"node["amenity"="hospital"](-6.3,106.7,-6.1,106.9);"#));
        assert!(query.contains(r#"way["shop"="supermarket"](-6.3,106.7,-6.1,106.9);"#));
        assert!(query.ends_with("out center;"));
        assert!(!query.contains("school"));
    }

    #[test]
    fn test_other_has_no_tag() {
        let bounds = BoundingBox::new(-6.3, 106.7, -6.1, 106.9).unwrap();
        let query = client().build_query(&bounds, &[PoiCategory::Other]);
        assert!(!query.contains("node["));
    }

    #[test]
    fn test_resolve_category() {
        let mut tags = HashMap::new();
        tags.insert("amenity".to_string(), "place_of_worship".to_string());
        assert_eq!(resolve_category(&tags), PoiCategory::Worship);

        let mut tags = HashMap::new();
        tags.insert("shop".to_string(), "bakery".to_string());
        assert_eq!(resolve_category(&tags), PoiCategory::Other);
    }

    #[test]
    fn test_convert_elements() {
        let json = r#"{
            "elements": [
                {"type": "node", "id": 1, "lat": -6.2, "lon": 106.8,
                 "tags": {"amenity": "hospital", "name": "RS Cipto"}},
                {"type": "node", "id": 2, "lat": -6.21, "lon": 106.81,
                 "tags": {"amenity": "school"}},
                {"type": "way", "id": 3, "center": {"lat": -6.22, "lon": 106.82},
                 "tags": {"shop": "supermarket", "name": "Hero"}},
                {"type": "way", "id": 4, "tags": {"name": "No position"}},
                {"type": "node", "id": 5, "lat": -6.23, "lon": 106.83,
                 "tags": {"leisure": "park", "name": "Taman"}}
            ]
        }"#;

        let response: OverpassResponse = serde_json::from_str(json).unwrap();
        let pois = OverpassClient::convert_elements_to_pois(response.elements);

        assert_eq!(pois.len(), 4);
        assert_eq!(pois[0].title, "RS Cipto");
        assert_eq!(pois[0].category, PoiCategory::Hospital);
        assert_eq!(pois[1].title, UNNAMED_POI_TITLE);
        assert_eq!(pois[1].category, PoiCategory::School);
        assert_eq!(pois[2].coordinates.lat, -6.22);
        assert_eq!(pois[3].category, PoiCategory::Other);
    }
}
