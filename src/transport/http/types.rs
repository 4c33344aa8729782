use crate::app::{ContentAggregator, ContentCache};
use crate::domain::collection::UnknownCollection;
use crate::error::{AggregationError, CmsError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<ContentAggregator>,
    pub cache: Arc<ContentCache>,
}

impl AppState {
    pub fn new(aggregator: ContentAggregator) -> Self {
        let cache = ContentCache::new(aggregator.config().cache_ttl);
        Self {
            aggregator: Arc::new(aggregator),
            cache: Arc::new(cache),
        }
    }
}

/// Error body returned by every endpoint.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// Token and site id are both set; without them every section is mock content.
    pub credentials_configured: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    UnknownCollection(#[from] UnknownCollection),

    #[error("CMS is not configured")]
    Configuration(String),

    #[error("failed to fetch collection")]
    Fetch(CmsError),

    #[error("failed to aggregate content")]
    Aggregation(#[from] AggregationError),
}

impl From<CmsError> for ApiError {
    fn from(err: CmsError) -> Self {
        match err {
            CmsError::Configuration(msg) => ApiError::Configuration(msg),
            other => ApiError::Fetch(other),
        }
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownCollection(_) => StatusCode::NOT_FOUND,
            ApiError::Configuration(_) | ApiError::Fetch(_) | ApiError::Aggregation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ApiError::UnknownCollection(_) => None,
            ApiError::Configuration(msg) => Some(msg.clone()),
            ApiError::Fetch(err) => Some(err.to_string()),
            ApiError::Aggregation(err) => Some(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, details = ?self.details(), "request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}
