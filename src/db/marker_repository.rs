use crate::error::{AppError, Result};
use crate::models::{Coordinates, Marker, MarkerUpdate, NewMarker};
use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Persistence for user-placed markers. Input is validated before the store
/// is touched; a missing id is `AppError::NotFound`.
#[async_trait]
pub trait MarkerRepository: Send + Sync {
    /// All markers, oldest first.
    async fn list(&self) -> Result<Vec<Marker>>;

    async fn get(&self, id: Uuid) -> Result<Marker>;

    async fn create(&self, new_marker: NewMarker) -> Result<Marker>;

    async fn update(&self, id: Uuid, update: MarkerUpdate) -> Result<Marker>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn health_check(&self) -> bool;

    fn backend_name(&self) -> &'static str;
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Marker {} not found", id))
}

#[derive(sqlx::FromRow)]
struct MarkerRow {
    id: Uuid,
    lat: f64,
    lng: f64,
    title: String,
    description: String,
    created_at: OffsetDateTime,
}

impl MarkerRow {
    fn into_marker(self) -> Marker {
        let coordinates = Coordinates::new(self.lat, self.lng).unwrap_or_else(|e| {
            tracing::error!(
                "Invalid coordinates for marker '{}' (id: {}): {}. Using fallback.",
                self.title,
                self.id,
                e
            );
            Coordinates { lat: 0.0, lng: 0.0 }
        });

        Marker {
            id: self.id,
            coordinates,
            title: self.title,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

const MARKER_COLUMNS: &str = "id, lat, lng, title, description, created_at";

pub struct PgMarkerRepository {
    pool: sqlx::PgPool,
}

impl PgMarkerRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MarkerRepository for PgMarkerRepository {
    async fn list(&self) -> Result<Vec<Marker>> {
        let rows: Vec<MarkerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM markers ORDER BY created_at ASC",
            MARKER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MarkerRow::into_marker).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Marker> {
        let row: Option<MarkerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM markers WHERE id = $1",
            MARKER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MarkerRow::into_marker).ok_or_else(|| not_found(id))
    }

    async fn create(&self, new_marker: NewMarker) -> Result<Marker> {
        let marker = new_marker.into_marker()?;

        sqlx::query(
            "INSERT INTO markers (id, lat, lng, title, description, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(marker.id)
        .bind(marker.coordinates.lat)
        .bind(marker.coordinates.lng)
        .bind(&marker.title)
        .bind(&marker.description)
        .bind(marker.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Created marker {} '{}'", marker.id, marker.title);
        Ok(marker)
    }

    async fn update(&self, id: Uuid, update: MarkerUpdate) -> Result<Marker> {
        update.validate()?;

        let row: Option<MarkerRow> = sqlx::query_as(&format!(
            "UPDATE markers SET title = $2, description = $3 WHERE id = $1 RETURNING {}",
            MARKER_COLUMNS
        ))
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MarkerRow::into_marker).ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM markers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// Process-local store used when no database is configured, and in tests.
#[derive(Default)]
pub struct InMemoryMarkerRepository {
    markers: RwLock<Vec<Marker>>,
}

impl InMemoryMarkerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarkerRepository for InMemoryMarkerRepository {
    async fn list(&self) -> Result<Vec<Marker>> {
        Ok(self.markers.read().await.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Marker> {
        self.markers
            .read()
            .await
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, new_marker: NewMarker) -> Result<Marker> {
        let marker = new_marker.into_marker()?;
        self.markers.write().await.push(marker.clone());
        Ok(marker)
    }

    async fn update(&self, id: Uuid, update: MarkerUpdate) -> Result<Marker> {
        update.validate()?;

        let mut markers = self.markers.write().await;
        let marker = markers
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found(id))?;
        marker.title = update.title;
        marker.description = update.description;
        Ok(marker.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut markers = self.markers.write().await;
        let before = markers.len();
        markers.retain(|m| m.id != id);
        if markers.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn monas() -> NewMarker {
        NewMarker {
            lat: -6.1754,
            lng: 106.8272,
            title: "Monas".to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_crud() {
        let repo = InMemoryMarkerRepository::new();

        let created = assert_ok!(repo.create(monas()).await);
        assert_eq!(repo.list().await.unwrap().len(), 1);

        let updated = repo
            .update(
                created.id,
                MarkerUpdate {
                    title: "Monumen Nasional".to_string(),
                    description: "Central Jakarta".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Monumen Nasional");
        assert_eq!(updated.coordinates, created.coordinates);
        assert_eq!(repo.get(created.id).await.unwrap(), updated);

        assert_ok!(repo.delete(created.id).await);
        assert_err!(repo.delete(created.id).await);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let repo = InMemoryMarkerRepository::new();
        let id = Uuid::new_v4();

        assert!(matches!(repo.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(repo.delete(id).await, Err(AppError::NotFound(_))));
        let update = MarkerUpdate {
            title: "x".to_string(),
            description: String::new(),
        };
        assert!(matches!(
            repo.update(id, update).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_store() {
        let repo = InMemoryMarkerRepository::new();
        let mut blank = monas();
        blank.title = " ".to_string();

        assert!(matches!(repo.create(blank).await, Err(AppError::Validation(_))));
        assert!(repo.list().await.unwrap().is_empty());
    }
}
