use crate::error::{AppError, Result};
use crate::models::Coordinates;
use serde::{Deserialize, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

/// A user-placed point. Owned by the marker store; read-only to the
/// routing and search services.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Marker {
    pub id: Uuid,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub created_at: OffsetDateTime,
}

fn serialize_rfc3339<S: Serializer>(
    value: &OffsetDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let formatted = value
        .format(&Rfc3339)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}

/// Body of a marker creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMarker {
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl NewMarker {
    pub fn validate(&self) -> Result<Coordinates> {
        validate_title(&self.title)?;
        Coordinates::new(self.lat, self.lng).map_err(AppError::Validation)
    }

    /// Validate and stamp a fresh id and creation time.
    pub fn into_marker(self) -> Result<Marker> {
        let coordinates = self.validate()?;
        Ok(Marker {
            id: Uuid::new_v4(),
            coordinates,
            title: self.title,
            description: self.description,
            created_at: OffsetDateTime::now_utc(),
        })
    }
}

/// Body of a marker update request. Position is immutable.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkerUpdate {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl MarkerUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)
    }
}
