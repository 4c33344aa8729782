use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeSet;
use utoipa::ToSchema;

/// A normalized CMS record: system fields plus open content fields.
///
/// Serialized flat, so `{"id": "p1", "name": "Ginger"}` round-trips with
/// `name` landing in [`Record::fields`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub fields: Map<String, JsonValue>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builder-style field setter, mostly for fixtures and fallback content.
    pub fn with(mut self, field: &str, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_str())
    }

    pub fn set(&mut self, field: impl Into<String>, value: JsonValue) {
        self.fields.insert(field.into(), value);
    }

    /// Serializes the record back into a JSON object.
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

/// Which referenced fields the CMS should expand in the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceInclusion {
    All,
    Fields(BTreeSet<String>),
    None,
}

/// Per-call query configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub references_to_include: ReferenceInclusion,
    /// CMS filter document, e.g. `{"reference": {"$eq": "a1"}}`.
    pub filter: Option<JsonValue>,
    pub limit: u32,
    pub include_total_count: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            references_to_include: ReferenceInclusion::All,
            filter: None,
            limit: 100,
            include_total_count: true,
        }
    }
}

impl QueryOptions {
    pub fn with_filter(mut self, filter: JsonValue) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }
}

/// Normalized result of one collection query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<Record>,
    pub total_count: u64,
    /// Always `items.len()`.
    pub count: usize,
    pub has_next: bool,
    /// Full product list; only set on the categories section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub all_products: Option<Vec<Record>>,
}

impl CollectionResponse {
    pub fn new(items: Vec<Record>, total_count: u64, has_next: bool) -> Self {
        let count = items.len();
        Self {
            items,
            total_count,
            count,
            has_next,
            all_products: None,
        }
    }

    /// Response for content that did not come from a paginated query
    /// (fallback content, degraded sections).
    pub fn from_items(items: Vec<Record>) -> Self {
        let total = items.len() as u64;
        Self::new(items, total, false)
    }

    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    pub fn first(&self) -> Option<&Record> {
        self.items.first()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
