//! Content model, reference joins and fallback content.
//!
//! Everything in here is pure: no I/O, no async.

pub mod collection;
pub mod content;
pub mod fallback;
pub mod homepage;
pub mod record;
pub mod resolve;
pub mod schema;

pub use collection::CollectionName;
pub use content::AggregatedContent;
pub use fallback::FallbackAction;
pub use homepage::{extract_homepage, ExtractedHomepageData};
pub use record::{CollectionResponse, QueryOptions, Record, ReferenceInclusion};
pub use resolve::resolve_category_references;
pub use schema::{Cardinality, ItemLayout, ReferenceField, ReferenceSchema};
