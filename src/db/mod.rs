use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub mod marker_repository;

pub use marker_repository::{InMemoryMarkerRepository, MarkerRepository, PgMarkerRepository};

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}
