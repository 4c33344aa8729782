pub mod app;
pub mod domain;
pub mod error;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{ContentAggregator, ContentCache};
pub use domain::{
    extract_homepage, resolve_category_references, AggregatedContent, CollectionName,
    CollectionResponse, ExtractedHomepageData, QueryOptions, Record,
};
pub use error::{AggregationError, CmsError};
pub use infra::cms::{CmsClient, CollectionSource};
pub use infra::config::CmsConfig;
