use crate::domain::collection::CollectionName;
use crate::domain::record::CollectionResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One aggregation pass over every homepage section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedContent {
    pub hero: CollectionResponse,
    /// About records; the first one carries `coreValues`.
    pub about: CollectionResponse,
    pub services: CollectionResponse,
    pub products: CollectionResponse,
    /// Categories with resolved product references and `allProducts`.
    pub categories: CollectionResponse,
    pub contact: CollectionResponse,
    pub carousel_images: CollectionResponse,
}

impl AggregatedContent {
    pub fn section(&self, name: CollectionName) -> Option<&CollectionResponse> {
        match name {
            CollectionName::Hero => Some(&self.hero),
            CollectionName::About => Some(&self.about),
            CollectionName::Services => Some(&self.services),
            CollectionName::ProductCatalog => Some(&self.categories),
            CollectionName::ProductDetail => Some(&self.products),
            CollectionName::Contact => Some(&self.contact),
            CollectionName::CarouselImage => Some(&self.carousel_images),
            // Embedded into `about`, not a section of its own.
            CollectionName::CoreValues => None,
        }
    }
}
