use crate::constants::*;
use crate::models::{BoundingBox, Poi, PoiCategory};
use crate::services::overpass::PoiSource;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Categories shown at a zoom level. Each threshold only adds categories, so
/// a higher zoom always shows a superset of a lower one.
pub fn visible_categories(zoom: f64, include_amenities: bool) -> Vec<PoiCategory> {
    let mut categories = Vec::new();
    if zoom < POI_MIN_ZOOM {
        return categories;
    }

    categories.extend([PoiCategory::Hospital, PoiCategory::University]);

    if zoom >= POI_SCHOOL_ZOOM {
        categories.push(PoiCategory::School);
    }

    if zoom >= POI_AMENITY_ZOOM {
        categories.push(PoiCategory::Supermarket);
        if include_amenities {
            categories.extend([
                PoiCategory::Restaurant,
                PoiCategory::Bank,
                PoiCategory::Fuel,
                PoiCategory::Hotel,
                PoiCategory::Worship,
            ]);
        }
    }

    categories
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub bounds: BoundingBox,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PoiLoadOutcome {
    /// Zoom below the POI threshold: cache emptied, nothing requested.
    Cleared,
    /// A fetch was already running; this trigger was dropped.
    Skipped,
    /// Cache replaced wholesale with `count` POIs.
    Replaced { count: usize },
    /// The cache was cleared while this fetch was running; result discarded.
    Superseded,
    /// Network error, timeout, 429 or 504. Cache left as it was.
    Failed,
}

/// Viewport-driven POI cache with at most one fetch in flight.
pub struct PoiAggregator {
    source: Arc<dyn PoiSource>,
    cache: RwLock<Arc<Vec<Poi>>>,
    last_viewport: RwLock<Option<Viewport>>,
    /// Single permit: holding it means a fetch is outstanding.
    fetch_slot: Semaphore,
    /// Bumped on every clear so late results from an older fetch are dropped.
    generation: AtomicU64,
    fetch_timeout: Duration,
    include_amenities: bool,
}

impl PoiAggregator {
    pub fn new(
        source: Arc<dyn PoiSource>,
        fetch_timeout: Duration,
        include_amenities: bool,
    ) -> Self {
        PoiAggregator {
            source,
            cache: RwLock::new(Arc::new(Vec::new())),
            last_viewport: RwLock::new(None),
            fetch_slot: Semaphore::new(1),
            generation: AtomicU64::new(0),
            fetch_timeout,
            include_amenities,
        }
    }

    pub fn visible_categories(&self, zoom: f64) -> Vec<PoiCategory> {
        visible_categories(zoom, self.include_amenities)
    }

    /// Entry point for map move/zoom events.
    pub async fn on_viewport_changed(&self, bounds: BoundingBox, zoom: f64) -> PoiLoadOutcome {
        *self
            .last_viewport
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Viewport { bounds, zoom });

        let categories = self.visible_categories(zoom);
        if categories.is_empty() {
            tracing::debug!("Zoom {} below {}, clearing POI cache", zoom, POI_MIN_ZOOM);
        }

        self.load_pois(bounds, &categories).await
    }

    /// Fetch `categories` inside `bounds` and replace the cache on success.
    /// No categories means nothing to show: the cache is cleared and no
    /// request is made.
    pub async fn load_pois(
        &self,
        bounds: BoundingBox,
        categories: &[PoiCategory],
    ) -> PoiLoadOutcome {
        if categories.is_empty() {
            self.clear();
            return PoiLoadOutcome::Cleared;
        }

        let _permit = match self.fetch_slot.try_acquire() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::debug!("POI fetch already in flight, dropping trigger");
                return PoiLoadOutcome::Skipped;
            }
        };

        let generation = self.generation.load(Ordering::SeqCst);
        tracing::debug!(
            "Loading POIs for {} categories in {}",
            categories.len(),
            bounds.to_overpass()
        );

        let fetched = tokio::time::timeout(
            self.fetch_timeout,
            self.source.fetch_pois(&bounds, categories),
        )
        .await;

        let mut pois = match fetched {
            Ok(Ok(pois)) => pois,
            Ok(Err(e)) => {
                if e.is_soft_failure() {
                    tracing::warn!("POI fetch failed, keeping cache: {}", e);
                } else {
                    tracing::error!("POI fetch error, keeping cache: {}", e);
                }
                return PoiLoadOutcome::Failed;
            }
            Err(_) => {
                tracing::warn!(
                    "POI fetch exceeded {:?}, cancelled; keeping cache",
                    self.fetch_timeout
                );
                return PoiLoadOutcome::Failed;
            }
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("POI cache cleared during fetch, discarding {} POIs", pois.len());
            return PoiLoadOutcome::Superseded;
        }

        // Way centers can fall just outside the queried box
        let fetched_count = pois.len();
        pois.retain(|poi| bounds.contains(&poi.coordinates));
        if pois.len() < fetched_count {
            tracing::debug!(
                "Dropped {} POIs outside {}",
                fetched_count - pois.len(),
                bounds.to_overpass()
            );
        }

        let count = pois.len();
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(pois);
        tracing::info!("POI cache replaced with {} POIs", count);

        PoiLoadOutcome::Replaced { count }
    }

    /// Snapshot of the current cache.
    pub fn pois(&self) -> Arc<Vec<Poi>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cache-only display filter. `None` means no user selection; never fetches.
    pub fn filter_cached(&self, selected: Option<&HashSet<PoiCategory>>) -> Vec<Poi> {
        let pois = self.pois();
        match selected {
            None => pois.as_ref().clone(),
            Some(selected) => pois
                .iter()
                .filter(|poi| selected.contains(&poi.category))
                .cloned()
                .collect(),
        }
    }

    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(Vec::new());
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch_slot.available_permits() == 0
    }

    pub fn last_viewport(&self) -> Option<Viewport> {
        *self
            .last_viewport
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
