//! The aggregation facade.
//!
//! One `fetch_all` call fans out one fetch per section, waits for all of
//! them to settle, resolves category references against the products fetched
//! in the same pass and assembles an [`AggregatedContent`]. Sibling fetches
//! are never cancelled: a failing required section is only reported once
//! every other section has settled.

use crate::app::resilience::{fetch_with_resilience, ContentOrigin, SectionFetch, SectionPolicy};
use crate::app::retry::{fetch_with_retry, RetryPolicy};
use crate::domain::collection::CollectionName;
use crate::domain::content::AggregatedContent;
use crate::domain::record::{CollectionResponse, QueryOptions, Record};
use crate::domain::resolve::{reference_ids, resolve_category_references};
use crate::domain::schema::ReferenceSchema;
use crate::error::{AggregationError, CmsResult};
use crate::infra::cms::CollectionSource;
use crate::infra::config::CmsConfig;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Field on a core-values record pointing at its about record.
pub const CORE_VALUES_REFERENCE_FIELD: &str = "reference";
/// Field on the about record holding its embedded core values.
pub const CORE_VALUES_FIELD: &str = "coreValues";

pub struct ContentAggregator {
    source: Arc<dyn CollectionSource>,
    config: Arc<CmsConfig>,
    category_schema: ReferenceSchema,
}

impl ContentAggregator {
    pub fn new(source: Arc<dyn CollectionSource>, config: Arc<CmsConfig>) -> Self {
        Self {
            source,
            config,
            category_schema: ReferenceSchema::categories(),
        }
    }

    /// Replaces the declared category joins (e.g. with the name heuristic).
    pub fn with_reference_schema(mut self, schema: ReferenceSchema) -> Self {
        self.category_schema = schema;
        self
    }

    pub fn config(&self) -> &CmsConfig {
        &self.config
    }

    /// Fetches every section concurrently.
    ///
    /// Fails only when a required section (hero by default) fails; every
    /// other section degrades to mock, emergency or empty content.
    pub async fn fetch_all(&self) -> Result<AggregatedContent, AggregationError> {
        let started = std::time::Instant::now();
        let (hero, about, services, (categories, products), contact, carousel) = tokio::join!(
            self.section(CollectionName::Hero),
            self.about_with_core_values(),
            self.section(CollectionName::Services),
            self.catalog(),
            self.section(CollectionName::Contact),
            self.section(CollectionName::CarouselImage),
        );

        let content = AggregatedContent {
            hero: settle(CollectionName::Hero, hero)?,
            about: settle(CollectionName::About, about)?,
            services: settle(CollectionName::Services, services)?,
            products: settle(CollectionName::ProductDetail, products)?,
            categories: settle(CollectionName::ProductCatalog, categories)?,
            contact: settle(CollectionName::Contact, contact)?,
            carousel_images: settle(CollectionName::CarouselImage, carousel)?,
        };
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            hero = content.hero.count,
            about = content.about.count,
            services = content.services.count,
            products = content.products.count,
            categories = content.categories.count,
            contact = content.contact.count,
            carousel_images = content.carousel_images.count,
            "content aggregation complete"
        );
        Ok(content)
    }

    /// Fetches a single collection for the inbound API: retries apply, but
    /// fallbacks do not, so failures surface to the caller. Categories are
    /// returned resolved; the about record carries its core values.
    pub async fn fetch_collection(&self, collection: CollectionName) -> CmsResult<CollectionResponse> {
        match collection {
            CollectionName::ProductCatalog => {
                let options = QueryOptions::default();
                let (categories, products) = tokio::join!(
                    self.query_with_retry(CollectionName::ProductCatalog, &options),
                    self.query_with_retry(CollectionName::ProductDetail, &options),
                );
                let products = products.map(|p| p.items).unwrap_or_else(|err| {
                    warn!(error = %err, "products unavailable, resolving categories against an empty set");
                    Vec::new()
                });
                Ok(self.resolve_categories(categories?, products))
            }
            CollectionName::About => {
                let mut about = self
                    .query_with_retry(CollectionName::About, &QueryOptions::default())
                    .await?;
                self.embed_core_values(&mut about).await;
                Ok(about)
            }
            other => self.query_with_retry(other, &QueryOptions::default()).await,
        }
    }

    async fn query_with_retry(
        &self,
        collection: CollectionName,
        options: &QueryOptions,
    ) -> CmsResult<CollectionResponse> {
        let policy = RetryPolicy::for_section(&self.config, self.config.is_required(collection));
        let source = self.source.as_ref();
        fetch_with_retry(collection, &policy, || source.query(collection, options)).await
    }

    async fn section_with(&self, collection: CollectionName, options: &QueryOptions) -> CmsResult<SectionFetch> {
        let policy = SectionPolicy::for_section(collection, &self.config);
        fetch_with_resilience(self.source.as_ref(), options, &policy, &self.config).await
    }

    async fn section(&self, collection: CollectionName) -> CmsResult<SectionFetch> {
        self.section_with(collection, &QueryOptions::default()).await
    }

    /// Categories and products settle together; resolution runs once both
    /// have. Returns `(categories, products)`.
    async fn catalog(&self) -> (CmsResult<SectionFetch>, CmsResult<SectionFetch>) {
        let (categories, products) = tokio::join!(
            self.section(CollectionName::ProductCatalog),
            self.section(CollectionName::ProductDetail),
        );
        // Placeholder and degraded sections are not a product set.
        let all_products = match &products {
            Ok(fetch) if matches!(fetch.origin, ContentOrigin::Live | ContentOrigin::Mock) => {
                fetch.response.items.clone()
            }
            Ok(fetch) => {
                debug!(origin = fetch.origin.as_str(), "products degraded, resolving categories against an empty set");
                Vec::new()
            }
            Err(_) => Vec::new(),
        };
        let categories = categories.map(|mut fetch| {
            fetch.response = self.resolve_categories(fetch.response, all_products);
            fetch
        });
        (categories, products)
    }

    fn resolve_categories(&self, categories: CollectionResponse, all_products: Vec<Record>) -> CollectionResponse {
        let CollectionResponse {
            items,
            total_count,
            has_next,
            ..
        } = categories;
        let items = resolve_category_references(items, &all_products, &self.category_schema);
        let mut resolved = CollectionResponse::new(items, total_count, has_next);
        resolved.all_products = Some(all_products);
        resolved
    }

    async fn about_with_core_values(&self) -> CmsResult<SectionFetch> {
        let mut about = self.section(CollectionName::About).await?;
        self.embed_core_values(&mut about.response).await;
        Ok(about)
    }

    /// Embeds core values into the first about record. Strictly sequential:
    /// the query needs the about id.
    async fn embed_core_values(&self, about: &mut CollectionResponse) {
        let Some(record) = about.items.first_mut() else {
            return;
        };
        let about_id = record.id.clone();
        let mut filter = serde_json::Map::new();
        filter.insert(CORE_VALUES_REFERENCE_FIELD.to_string(), json!({ "$eq": about_id }));
        let options = QueryOptions::default().with_filter(JsonValue::Object(filter));

        let values = match self.section_with(CollectionName::CoreValues, &options).await {
            Ok(fetch) => fetch.response.items,
            Err(err) => {
                warn!(about_id = %about_id, error = %err, "core values unavailable");
                Vec::new()
            }
        };
        let embedded: Vec<JsonValue> = values
            .iter()
            .filter(|v| references(v, &about_id))
            .map(Record::to_json)
            .collect();
        debug!(about_id = %about_id, core_values = embedded.len(), "embedded core values");
        record.set(CORE_VALUES_FIELD, JsonValue::Array(embedded));
    }
}

fn references(value: &Record, about_id: &str) -> bool {
    value
        .get(CORE_VALUES_REFERENCE_FIELD)
        .map(|r| reference_ids(r).iter().any(|id| id == about_id))
        .unwrap_or(false)
}

fn settle(
    section: CollectionName,
    result: CmsResult<SectionFetch>,
) -> Result<CollectionResponse, AggregationError> {
    result
        .map(|fetch| fetch.response)
        .map_err(|source| AggregationError { section, source })
}
