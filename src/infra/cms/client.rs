// Responsible for all communication with the CMS data API.

use crate::domain::collection::CollectionName;
use crate::domain::record::{CollectionResponse, QueryOptions};
use crate::domain::schema::item_layout;
use crate::error::{CmsError, CmsResult};
use crate::infra::cms::envelope::{QueryEnvelope, QueryRequest};
use crate::infra::config::CmsConfig;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

pub const QUERY_PATH: &str = "/wix-data/v2/items/query";
pub const SITE_ID_HEADER: &str = "wix-site-id";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Anything that can answer a single collection query.
///
/// The aggregation layer only depends on this trait, so tests and tooling can
/// substitute their own source.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    async fn query(
        &self,
        collection: CollectionName,
        options: &QueryOptions,
    ) -> CmsResult<CollectionResponse>;
}

/// HTTP client for the CMS data-query endpoint.
pub struct CmsClient {
    http: reqwest::Client,
    config: Arc<CmsConfig>,
}

impl CmsClient {
    pub fn new(config: Arc<CmsConfig>) -> CmsResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| CmsError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CmsConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), QUERY_PATH)
    }

    fn credentials(&self) -> CmsResult<(&str, &str)> {
        match (self.config.api_token.as_deref(), self.config.site_id.as_deref()) {
            (Some(token), Some(site)) => Ok((token, site)),
            (None, _) => Err(CmsError::Configuration("WIX_API_KEY is not set".to_string())),
            (_, None) => Err(CmsError::Configuration("WIX_SITE_ID is not set".to_string())),
        }
    }
}

#[async_trait]
impl CollectionSource for CmsClient {
    #[instrument(skip(self, options))]
    async fn query(
        &self,
        collection: CollectionName,
        options: &QueryOptions,
    ) -> CmsResult<CollectionResponse> {
        let (token, site_id) = self.credentials()?;
        let collection_id = self.config.collection_id(collection);
        let body = QueryRequest::new(collection_id, options);

        let response = self
            .http
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(SITE_ID_HEADER, site_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // Whole-request deadlines are per attempt, in the retry layer.
                if e.is_timeout() {
                    CmsError::Timeout {
                        after: CONNECT_TIMEOUT,
                    }
                } else {
                    CmsError::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), collection_id, "CMS query rejected");
            return Err(CmsError::from_status(status.as_u16(), text));
        }

        let text = response.text().await.map_err(CmsError::from)?;
        let envelope: QueryEnvelope = serde_json::from_str(&text)
            .map_err(|e| CmsError::Parse(format!("{collection_id}: {e}")))?;
        let parsed = envelope.into_response(item_layout(collection));
        debug!(
            collection_id,
            count = parsed.count,
            total = parsed.total_count,
            has_next = parsed.has_next,
            "CMS query ok"
        );
        Ok(parsed)
    }
}
