use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Network failure: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    #[error("Routing API error: {0}")]
    RoutingApi(String),

    #[error("Overpass API error: {0}")]
    OverpassApi(String),

    #[error("Geocoding API error: {0}")]
    GeocodingApi(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a transport-level reqwest failure onto the taxonomy.
    pub fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(format!("{}: {}", context, err))
        } else {
            AppError::Network(format!("{}: {}", context, err))
        }
    }

    /// Map a non-success HTTP status onto the taxonomy. 429 and 504 get their
    /// own variants; everything else is a network failure.
    pub fn from_status(context: &str, status: u16, body: &str) -> Self {
        match status {
            crate::constants::HTTP_TOO_MANY_REQUESTS => {
                AppError::RateLimited(format!("{}: HTTP {}", context, status))
            }
            crate::constants::HTTP_GATEWAY_TIMEOUT => {
                AppError::UpstreamTimeout(format!("{}: HTTP {}", context, status))
            }
            _ => AppError::Network(format!("{}: HTTP {}: {}", context, status, body)),
        }
    }

    /// Failures that POI loading absorbs, leaving the cache untouched.
    pub fn is_soft_failure(&self) -> bool {
        matches!(
            self,
            AppError::Network(_)
                | AppError::Timeout(_)
                | AppError::RateLimited(_)
                | AppError::UpstreamTimeout(_)
                | AppError::OverpassApi(_)
        )
    }
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal database error")
            }
            AppError::Network(ref e)
            | AppError::RoutingApi(ref e)
            | AppError::OverpassApi(ref e)
            | AppError::GeocodingApi(ref e) => {
                tracing::error!("Upstream service error: {}", e);
                (StatusCode::BAD_GATEWAY, "Upstream service error")
            }
            AppError::Timeout(ref e) | AppError::UpstreamTimeout(ref e) => {
                tracing::warn!("Upstream timeout: {}", e);
                (StatusCode::GATEWAY_TIMEOUT, "Upstream service timed out")
            }
            AppError::RateLimited(ref e) => {
                tracing::warn!("Rate limited: {}", e);
                (StatusCode::TOO_MANY_REQUESTS, "Upstream service rate limited")
            }
            AppError::Validation(ref e) | AppError::InvalidRequest(ref e) => {
                (StatusCode::BAD_REQUEST, e.as_str())
            }
            AppError::NotFound(ref e) => (StatusCode::NOT_FOUND, e.as_str()),
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_distinguishes_rate_limit_and_gateway_timeout() {
        assert!(matches!(
            AppError::from_status("overpass", 429, ""),
            AppError::RateLimited(_)
        ));
        assert!(matches!(
            AppError::from_status("overpass", 504, ""),
            AppError::UpstreamTimeout(_)
        ));
        assert!(matches!(
            AppError::from_status("overpass", 500, "boom"),
            AppError::Network(_)
        ));
    }

    #[test]
    fn soft_failures() {
        assert!(AppError::Timeout("t".into()).is_soft_failure());
        assert!(AppError::RateLimited("r".into()).is_soft_failure());
        assert!(AppError::UpstreamTimeout("u".into()).is_soft_failure());
        assert!(!AppError::Validation("v".into()).is_soft_failure());
        assert!(!AppError::NotFound("n".into()).is_soft_failure());
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::NotFound("Marker not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::Validation("title must not be empty".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
