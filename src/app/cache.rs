//! Caller-level cache for aggregated content.
//!
//! Holds the last successful aggregation for a fixed TTL. Failed aggregations
//! are never stored, so a recovering CMS is picked up on the next call.

use crate::app::aggregator::ContentAggregator;
use crate::domain::content::AggregatedContent;
use crate::error::AggregationError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

struct Entry {
    stored_at: Instant,
    content: Arc<AggregatedContent>,
}

pub struct ContentCache {
    ttl: Duration,
    entry: RwLock<Option<Entry>>,
}

impl ContentCache {
    /// A zero TTL disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Fresh cached content, if any.
    pub async fn get(&self) -> Option<Arc<AggregatedContent>> {
        if !self.is_enabled() {
            return None;
        }
        let guard = self.entry.read().await;
        guard
            .as_ref()
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.content.clone())
    }

    pub async fn put(&self, content: AggregatedContent) -> Arc<AggregatedContent> {
        let content = Arc::new(content);
        if self.is_enabled() {
            let mut guard = self.entry.write().await;
            *guard = Some(Entry {
                stored_at: Instant::now(),
                content: content.clone(),
            });
        }
        content
    }

    /// Cached content, or a fresh aggregation stored on success.
    pub async fn get_or_fetch(
        &self,
        aggregator: &ContentAggregator,
    ) -> Result<Arc<AggregatedContent>, AggregationError> {
        if let Some(content) = self.get().await {
            debug!("serving aggregated content from cache");
            return Ok(content);
        }
        let content = aggregator.fetch_all().await?;
        Ok(self.put(content).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{CollectionResponse, Record};

    fn content(hero_id: &str) -> AggregatedContent {
        AggregatedContent {
            hero: CollectionResponse::from_items(vec![Record::new(hero_id)]),
            ..AggregatedContent::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = ContentCache::new(Duration::from_secs(60));
        cache.put(content("h1")).await;
        assert_eq!(cache.get().await.unwrap().hero.items[0].id, "h1");

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn zero_ttl_disables_the_cache() {
        let cache = ContentCache::new(Duration::ZERO);
        cache.put(content("h1")).await;
        assert!(cache.get().await.is_none());
    }
}
