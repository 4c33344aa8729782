//! Centralized configuration (environment variables + defaults).
//!
//! The core never reads the environment itself: binaries call
//! [`CmsConfig::from_env`] once and pass the struct into constructors, tests
//! build fixture configs directly.

use crate::domain::collection::CollectionName;
use crate::domain::fallback::default_signatures;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.wixapis.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct CmsConfig {
    /// Bearer token for the CMS data API.
    pub api_token: Option<String>,
    pub site_id: Option<String>,
    pub base_url: String,
    /// Collection id overrides, keyed by logical collection.
    pub collection_ids: HashMap<CollectionName, String>,
    /// Attempts for required sections; non-required sections use one less
    /// (never below one).
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Per-attempt timeout for required sections.
    pub request_timeout: Duration,
    /// Per-attempt timeout for every other section.
    pub secondary_timeout: Duration,
    /// Sections whose failure fails the whole aggregation.
    pub required_sections: BTreeSet<CollectionName>,
    /// Sections where an empty result is treated as a failure.
    pub non_empty_sections: BTreeSet<CollectionName>,
    /// Error text fragments treated as internal CMS failures.
    pub internal_error_signatures: Vec<String>,
    /// Zero disables the aggregate cache.
    pub cache_ttl: Duration,
    pub bind_addr: String,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            site_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            collection_ids: HashMap::new(),
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(5000),
            request_timeout: Duration::from_secs(15),
            secondary_timeout: Duration::from_secs(10),
            required_sections: BTreeSet::from([CollectionName::Hero]),
            non_empty_sections: BTreeSet::new(),
            internal_error_signatures: default_signatures(),
            cache_ttl: Duration::from_secs(60),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// Parses a comma or space separated list of collection names. Unknown
/// names are ignored, so `none` yields an empty set.
fn parse_sections(raw: &str) -> BTreeSet<CollectionName> {
    raw.split(|c: char| c == ',' || c == ' ')
        .filter_map(|name| name.trim().parse::<CollectionName>().ok())
        .collect()
}

impl CmsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Blank values count as unset;
    /// unparsable numbers keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let num = |key: &str| var(key).and_then(|v| v.parse::<u64>().ok());

        let mut cfg = Self::default();
        cfg.api_token = var("WIX_API_KEY");
        cfg.site_id = var("WIX_SITE_ID");
        if let Some(v) = var("WIX_API_BASE_URL") {
            cfg.base_url = v.trim_end_matches('/').to_string();
        }
        for collection in CollectionName::ALL {
            if let Some(id) = var(collection.env_override_key()) {
                cfg.collection_ids.insert(collection, id);
            }
        }
        if let Some(n) = num("CMS_RETRY_MAX_ATTEMPTS") {
            cfg.max_attempts = u32::try_from(n).unwrap_or(u32::MAX).max(1);
        }
        if let Some(ms) = num("CMS_RETRY_BASE_DELAY_MS") {
            cfg.base_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = num("CMS_RETRY_MAX_DELAY_MS") {
            cfg.max_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = num("CMS_REQUEST_TIMEOUT_SECS") {
            cfg.request_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = num("CMS_SECONDARY_TIMEOUT_SECS") {
            cfg.secondary_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(v) = var("CMS_REQUIRED_SECTIONS") {
            cfg.required_sections = parse_sections(&v);
        }
        if let Some(v) = var("CMS_NON_EMPTY_SECTIONS") {
            cfg.non_empty_sections = parse_sections(&v);
        }
        if let Some(v) = var("CMS_INTERNAL_ERROR_SIGNATURES") {
            cfg.internal_error_signatures = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(secs) = num("CONTENT_CACHE_TTL_SECS") {
            cfg.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(v) = var("API_BIND_ADDR") {
            cfg.bind_addr = v;
        }
        cfg
    }

    /// Both the token and the site id are configured.
    pub fn has_credentials(&self) -> bool {
        self.api_token.is_some() && self.site_id.is_some()
    }

    /// CMS collection id for a logical collection.
    pub fn collection_id(&self, collection: CollectionName) -> &str {
        self.collection_ids
            .get(&collection)
            .map(String::as_str)
            .unwrap_or_else(|| collection.default_collection_id())
    }

    pub fn is_required(&self, collection: CollectionName) -> bool {
        self.required_sections.contains(&collection)
    }

    /// An empty result for this section counts as a failed fetch.
    pub fn requires_content(&self, collection: CollectionName) -> bool {
        self.non_empty_sections.contains(&collection)
    }

    /// Builder used by tests and tooling.
    pub fn with_credentials(mut self, token: &str, site_id: &str) -> Self {
        self.api_token = Some(token.to_string());
        self.site_id = Some(site_id.to_string());
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}
