use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waymark::config::Config;
use std::time::Duration;
use waymark::constants::{
    GEOCODE_CACHE_MAX_ENTRIES, POI_SESSION_IDLE_SECONDS, POI_SESSION_MAX_ENTRIES,
};
use waymark::db::{InMemoryMarkerRepository, MarkerRepository, PgMarkerRepository};
use waymark::services::nominatim::NominatimClient;
use waymark::services::osrm::OsrmClient;
use waymark::services::overpass::OverpassClient;
use waymark::services::poi_sessions::PoiSessions;
use waymark::services::route_planner::RoutePlanner;
use waymark::services::search_index::LocationSearchIndex;
use waymark::services::transport::TransportModeEstimator;
use waymark::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waymark=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting Waymark API server");
    tracing::info!("Configuration loaded successfully");

    // Marker store: Postgres when configured, otherwise in-memory
    let markers: Arc<dyn MarkerRepository> = if let Some(ref database_url) = config.database_url {
        tracing::info!("Connecting to database...");
        let db_pool = waymark::db::create_pool(database_url).await?;
        tracing::info!("Database connection established");

        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Database migrations completed");

        Arc::new(PgMarkerRepository::new(db_pool))
    } else {
        tracing::info!("DATABASE_URL not configured. Using in-memory marker store.");
        Arc::new(InMemoryMarkerRepository::new())
    };

    // Initialize services
    let osrm = OsrmClient::new(config.osrm_base_url.clone(), config.routing_timeout())?;
    let overpass = OverpassClient::new(config.overpass_url.clone(), config.poi_fetch_timeout())?;
    let nominatim = NominatimClient::new(
        config.nominatim_url.clone(),
        &config.user_agent,
        config.routing_timeout(),
        config.geocode_cache_ttl,
        GEOCODE_CACHE_MAX_ENTRIES,
    )?;

    let planner = RoutePlanner::new(
        Arc::new(osrm),
        TransportModeEstimator::new(config.include_active_modes),
    );
    let pois = PoiSessions::new(
        Arc::new(overpass),
        config.poi_fetch_timeout(),
        config.include_amenity_pois,
        Duration::from_secs(POI_SESSION_IDLE_SECONDS),
        POI_SESSION_MAX_ENTRIES,
    );
    let search = LocationSearchIndex::new(Arc::new(nominatim));

    // Create application state
    let state = Arc::new(AppState {
        markers,
        planner: Arc::new(planner),
        pois: Arc::new(pois),
        search: Arc::new(search),
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", waymark::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
