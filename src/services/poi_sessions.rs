use crate::services::overpass::PoiSource;
use crate::services::poi_aggregator::PoiAggregator;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// One POI cache per map session, keyed by the caller's session id.
///
/// A session starts on its first viewport change and ends when the client
/// closes it or after it has been idle for `idle_ttl`. Sessions never share
/// a cache or an in-flight fetch.
pub struct PoiSessions {
    source: Arc<dyn PoiSource>,
    fetch_timeout: Duration,
    include_amenities: bool,
    sessions: Cache<String, Arc<PoiAggregator>>,
}

impl PoiSessions {
    pub fn new(
        source: Arc<dyn PoiSource>,
        fetch_timeout: Duration,
        include_amenities: bool,
        idle_ttl: Duration,
        max_sessions: u64,
    ) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(idle_ttl)
            .max_capacity(max_sessions)
            .build();

        PoiSessions {
            source,
            fetch_timeout,
            include_amenities,
            sessions,
        }
    }

    /// A fresh aggregator that belongs to no session.
    pub fn detached(&self) -> PoiAggregator {
        PoiAggregator::new(
            self.source.clone(),
            self.fetch_timeout,
            self.include_amenities,
        )
    }

    pub async fn get_or_create(&self, session_id: &str) -> Arc<PoiAggregator> {
        self.sessions
            .get_with(session_id.to_string(), async {
                tracing::debug!("Opening POI session {}", session_id);
                Arc::new(self.detached())
            })
            .await
    }

    pub async fn get(&self, session_id: &str) -> Option<Arc<PoiAggregator>> {
        self.sessions.get(session_id).await
    }

    /// Drop a session's cache. Returns false when the session is unknown.
    pub async fn end(&self, session_id: &str) -> bool {
        let ended = self.sessions.remove(session_id).await.is_some();
        if ended {
            tracing::debug!("Closed POI session {}", session_id);
        }
        ended
    }

    /// Approximate number of live sessions.
    pub fn active_sessions(&self) -> u64 {
        self.sessions.entry_count()
    }
}
