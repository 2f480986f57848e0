use crate::constants::SEARCH_RESULT_LIMIT;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, SearchResult};
use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Free-text place lookup against an external geocoder.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn search_places(&self, query: &str) -> Result<Vec<SearchResult>>;
}

/// Nominatim client. Results are cached per normalized query with a TTL,
/// since the public instance enforces an aggressive usage policy.
pub struct NominatimClient {
    client: Client,
    base_url: String,
    places: Cache<String, Arc<Vec<SearchResult>>>,
}

impl NominatimClient {
    pub fn new(
        base_url: String,
        user_agent: &str,
        timeout: Duration,
        cache_ttl_seconds: u64,
        max_capacity: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let places = Cache::builder()
            .time_to_live(Duration::from_secs(cache_ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        Ok(NominatimClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            places,
        })
    }

    fn cache_key(query: &str) -> String {
        query.trim().to_lowercase()
    }

    async fn fetch_places(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = format!("{}/search", self.base_url);
        let limit = SEARCH_RESULT_LIMIT.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("q", query), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| AppError::from_reqwest("Nominatim request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::from_status("Nominatim", status.as_u16(), &error_text));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| AppError::GeocodingApi(format!("Failed to parse response: {}", e)))?;

        Ok(convert_places(places))
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn search_places(&self, query: &str) -> Result<Vec<SearchResult>> {
        let key = Self::cache_key(query);

        if let Some(cached) = self.places.get(&key).await {
            tracing::debug!("Geocode cache hit: {}", key);
            return Ok((*cached).clone());
        }

        let places = self.fetch_places(query.trim()).await?;
        tracing::debug!("Geocoded '{}' to {} place(s)", key, places.len());
        self.places.insert(key, Arc::new(places.clone())).await;

        Ok(places)
    }
}

// Nominatim returns coordinates as decimal strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

fn convert_places(places: Vec<NominatimPlace>) -> Vec<SearchResult> {
    places
        .into_iter()
        .filter_map(|place| {
            let lat = place.lat.parse::<f64>().ok()?;
            let lng = place.lon.parse::<f64>().ok()?;
            let coordinates = match Coordinates::new(lat, lng) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("Skipping geocoder row '{}': {}", place.display_name, e);
                    return None;
                }
            };
            Some(SearchResult::Place {
                title: place.display_name,
                coordinates,
            })
        })
        .take(SEARCH_RESULT_LIMIT)
        .collect()
}
