//! First-item-or-mock projection of aggregated content for the homepage.

use crate::domain::collection::CollectionName;
use crate::domain::content::AggregatedContent;
use crate::domain::fallback::mock_records;
use crate::domain::record::{CollectionResponse, Record};
use crate::domain::resolve::resolve_category_references;
use crate::domain::schema::ReferenceSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedHomepageData {
    #[schema(value_type = Object)]
    pub hero_data: Record,
    #[schema(value_type = Object)]
    pub about_data: Record,
    #[schema(value_type = Object)]
    pub services_data: Record,
    /// First category, carrying its resolved products and `allProducts`.
    #[schema(value_type = Object)]
    pub products_data: Record,
    #[schema(value_type = Object)]
    pub contact_data: Record,
}

impl ExtractedHomepageData {
    /// Static content for every section.
    pub fn mock() -> Self {
        Self {
            hero_data: mock_first(CollectionName::Hero),
            about_data: mock_first(CollectionName::About),
            services_data: mock_first(CollectionName::Services),
            products_data: mock_first(CollectionName::ProductCatalog),
            contact_data: mock_first(CollectionName::Contact),
        }
    }
}

/// Mock default for a section. The mock category is resolved against the
/// mock products so it has the same shape as live data.
fn mock_first(collection: CollectionName) -> Record {
    let records = match collection {
        CollectionName::ProductCatalog => resolve_category_references(
            mock_records(CollectionName::ProductCatalog),
            &mock_records(CollectionName::ProductDetail),
            &ReferenceSchema::categories(),
        ),
        other => mock_records(other),
    };
    records.into_iter().next().unwrap_or_default()
}

fn first_or_mock(section: &CollectionResponse, collection: CollectionName) -> Record {
    section
        .first()
        .cloned()
        .unwrap_or_else(|| mock_first(collection))
}

/// Picks the first record of each section, falling back per section.
pub fn extract_homepage(aggregated: Option<&AggregatedContent>, use_fetched: bool) -> ExtractedHomepageData {
    let Some(content) = aggregated.filter(|_| use_fetched) else {
        return ExtractedHomepageData::mock();
    };

    ExtractedHomepageData {
        hero_data: first_or_mock(&content.hero, CollectionName::Hero),
        about_data: first_or_mock(&content.about, CollectionName::About),
        services_data: first_or_mock(&content.services, CollectionName::Services),
        products_data: first_or_mock(&content.categories, CollectionName::ProductCatalog),
        contact_data: first_or_mock(&content.contact, CollectionName::Contact),
    }
}
