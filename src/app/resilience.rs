//! Retry + fallback wrapper around a single section fetch.

use crate::app::retry::{fetch_with_retry, RetryPolicy};
use crate::domain::collection::CollectionName;
use crate::domain::fallback::{emergency_record, matches_internal_signature, mock_records, FallbackAction};
use crate::domain::record::{CollectionResponse, QueryOptions};
use crate::error::{CmsError, CmsResult};
use crate::infra::cms::CollectionSource;
use crate::infra::config::CmsConfig;
use tracing::{info, warn};

/// How a section is fetched and what happens when it cannot be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionPolicy {
    pub collection: CollectionName,
    /// Failure propagates to the caller instead of degrading.
    pub required: bool,
    /// An empty result counts as a failure.
    pub require_non_empty: bool,
    pub retry: RetryPolicy,
}

impl SectionPolicy {
    pub fn for_section(collection: CollectionName, config: &CmsConfig) -> Self {
        let required = config.is_required(collection);
        Self {
            collection,
            required,
            require_non_empty: config.requires_content(collection),
            retry: RetryPolicy::for_section(config, required),
        }
    }
}

/// Where a section's records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    Live,
    Mock,
    Emergency,
    Empty,
}

impl ContentOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentOrigin::Live => "live",
            ContentOrigin::Mock => "mock",
            ContentOrigin::Emergency => "emergency",
            ContentOrigin::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionFetch {
    pub response: CollectionResponse,
    pub origin: ContentOrigin,
}

impl SectionFetch {
    fn live(response: CollectionResponse) -> Self {
        Self {
            response,
            origin: ContentOrigin::Live,
        }
    }
}

/// Fetches one section with retries, then applies the fallback decision
/// table on terminal failure. Only [`FallbackAction::Propagate`] yields an
/// error.
pub async fn fetch_with_resilience(
    source: &dyn CollectionSource,
    options: &QueryOptions,
    policy: &SectionPolicy,
    config: &CmsConfig,
) -> CmsResult<SectionFetch> {
    let collection = policy.collection;
    let result = fetch_with_retry(collection, &policy.retry, || source.query(collection, options)).await;

    let err = match result {
        Ok(response) if response.is_empty() && policy.require_non_empty => {
            CmsError::EmptyCollection(collection)
        }
        Ok(response) => return Ok(SectionFetch::live(response)),
        Err(err) => err,
    };

    let internal = matches_internal_signature(&err.signature_text(), &config.internal_error_signatures);
    let action = FallbackAction::decide(config.has_credentials(), internal, policy.required);
    apply_fallback(collection, action, err)
}

fn apply_fallback(
    collection: CollectionName,
    action: FallbackAction,
    err: CmsError,
) -> CmsResult<SectionFetch> {
    match action {
        FallbackAction::Mock => {
            info!(%collection, action = action.as_str(), reason = %err, "serving mock content");
            Ok(SectionFetch {
                response: CollectionResponse::from_items(mock_records(collection)),
                origin: ContentOrigin::Mock,
            })
        }
        FallbackAction::Emergency => {
            warn!(%collection, action = action.as_str(), reason = %err, "CMS internal error, serving emergency content");
            Ok(SectionFetch {
                response: CollectionResponse::from_items(vec![emergency_record(collection)]),
                origin: ContentOrigin::Emergency,
            })
        }
        FallbackAction::Empty => {
            warn!(%collection, action = action.as_str(), reason = %err, "section degraded to empty");
            Ok(SectionFetch {
                response: CollectionResponse::empty(),
                origin: ContentOrigin::Empty,
            })
        }
        FallbackAction::Propagate => {
            warn!(%collection, action = action.as_str(), reason = %err, "required section failed");
            Err(err)
        }
    }
}
