pub mod aggregator;
pub mod cache;
pub mod resilience;
pub mod retry;

pub use aggregator::ContentAggregator;
pub use cache::ContentCache;
pub use resilience::{fetch_with_resilience, ContentOrigin, SectionFetch, SectionPolicy};
pub use retry::{fetch_with_retry, RetryPolicy};
