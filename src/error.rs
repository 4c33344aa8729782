//! Error taxonomy for CMS access and aggregation.

use crate::domain::collection::CollectionName;
use std::time::Duration;

pub type CmsResult<T> = Result<T, CmsError>;

/// Failures surfaced by a single collection query.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CmsError {
    /// 4xx from the CMS. Never retried.
    #[error("CMS rejected the request (status={status}): {reason}")]
    Auth { status: u16, reason: String, detail: String },

    /// 5xx or a transport failure. Retryable.
    #[error("CMS request failed{}: {detail}", status_suffix(.status))]
    Network { status: Option<u16>, detail: String },

    #[error("CMS request timed out after {after:?}")]
    Timeout { after: Duration },

    /// Credentials or collection ids are missing.
    #[error("CMS configuration error: {0}")]
    Configuration(String),

    #[error("failed to parse CMS response: {0}")]
    Parse(String),

    #[error("collection '{0}' returned no records")]
    EmptyCollection(CollectionName),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status={s})")).unwrap_or_default()
}

impl CmsError {
    /// Maps a non-success HTTP status onto the taxonomy.
    pub fn from_status(status: u16, body: String) -> Self {
        if (400..500).contains(&status) {
            let reason = match status {
                401 => "authentication failed",
                403 => "access denied",
                404 => "collection not found",
                _ => "request rejected",
            };
            CmsError::Auth {
                status,
                reason: reason.to_string(),
                detail: body,
            }
        } else {
            CmsError::Network {
                status: Some(status),
                detail: body,
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, CmsError::Network { .. } | CmsError::Timeout { .. })
    }

    /// Text searched for known internal CMS error signatures.
    pub fn signature_text(&self) -> String {
        match self {
            CmsError::Auth { reason, detail, .. } => format!("{reason} {detail}"),
            CmsError::Network { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for CmsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return CmsError::Parse(err.to_string());
        }
        CmsError::Network {
            status: err.status().map(|s| s.as_u16()),
            detail: err.to_string(),
        }
    }
}

/// Raised by the aggregation facade when a required section cannot be served.
#[derive(Debug, Clone, thiserror::Error)]
#[error("required section '{section}' failed: {source}")]
pub struct AggregationError {
    pub section: CollectionName,
    #[source]
    pub source: CmsError,
}
