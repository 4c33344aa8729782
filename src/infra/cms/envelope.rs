//! CMS wire format and item normalization.
//!
//! The CMS is inconsistent about where item content lives: most collections
//! nest it under `data`, some serve it at the top level. All of that is
//! handled here so the rest of the crate only sees [`Record`]s.

use crate::domain::record::{CollectionResponse, QueryOptions, Record, ReferenceInclusion};
use crate::domain::schema::ItemLayout;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Keys that are never treated as content.
const SYSTEM_KEYS: [&str; 7] = [
    "id",
    "_id",
    "_owner",
    "_createdDate",
    "_updatedDate",
    "dataCollectionId",
    "data",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<'a> {
    pub data_collection_id: &'a str,
    pub include_referenced_items: bool,
    pub return_total_count: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub referenced_item_options: Vec<ReferencedItemOption>,
    pub cursor_paging: CursorPaging,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a JsonValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencedItemOption {
    pub field_name: String,
}

#[derive(Debug, Serialize)]
pub struct CursorPaging {
    pub limit: u32,
}

impl<'a> QueryRequest<'a> {
    pub fn new(collection_id: &'a str, options: &'a QueryOptions) -> Self {
        let (include_referenced_items, referenced_item_options) = match &options.references_to_include {
            ReferenceInclusion::All => (true, Vec::new()),
            ReferenceInclusion::Fields(fields) if fields.contains("*") => (true, Vec::new()),
            ReferenceInclusion::Fields(fields) => (
                !fields.is_empty(),
                fields
                    .iter()
                    .map(|f| ReferencedItemOption { field_name: f.clone() })
                    .collect(),
            ),
            ReferenceInclusion::None => (false, Vec::new()),
        };
        Self {
            data_collection_id: collection_id,
            include_referenced_items,
            return_total_count: options.include_total_count,
            referenced_item_options,
            cursor_paging: CursorPaging { limit: options.limit },
            filter: options.filter.as_ref(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEnvelope {
    #[serde(default)]
    pub data_items: Vec<Map<String, JsonValue>>,
    #[serde(default)]
    pub paging_metadata: Option<PagingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingMetadata {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub too_many_to_count: Option<bool>,
    #[serde(default)]
    pub cursors: Option<JsonValue>,
    #[serde(default)]
    pub has_next: Option<bool>,
}

impl QueryEnvelope {
    /// Normalizes every item and builds the response shape.
    pub fn into_response(self, layout: ItemLayout) -> CollectionResponse {
        let items: Vec<Record> = self
            .data_items
            .iter()
            .filter_map(|raw| normalize_item(raw, layout))
            .collect();
        let paging = self.paging_metadata.unwrap_or_default();
        let total = paging.total.unwrap_or(items.len() as u64);
        CollectionResponse::new(items, total, paging.has_next.unwrap_or(false))
    }
}

fn is_system_key(key: &str) -> bool {
    SYSTEM_KEYS.contains(&key)
}

/// Flattens one raw CMS item. Items without any id are dropped.
pub fn normalize_item(raw: &Map<String, JsonValue>, layout: ItemLayout) -> Option<Record> {
    let data = raw
        .get("data")
        .and_then(|v| v.as_object())
        .filter(|d| !d.is_empty());

    let content: &Map<String, JsonValue> = match (layout, data) {
        (ItemLayout::DataEnvelope, Some(d)) | (ItemLayout::Detect, Some(d)) => d,
        (ItemLayout::DataEnvelope, None) => {
            tracing::debug!("item declared with a data envelope has none; using top-level fields");
            raw
        }
        (ItemLayout::TopLevel, _) | (ItemLayout::Detect, None) => raw,
    };

    let id = string_field(raw, "id")
        .or_else(|| string_field(raw, "_id"))
        .or_else(|| string_field(content, "_id"))
        .or_else(|| string_field(content, "id"))?;

    let mut record = Record::new(id);
    record.owner_id = system_value(content, raw, "_owner")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    record.created_at = system_value(content, raw, "_createdDate").and_then(normalize_date);
    record.updated_at = system_value(content, raw, "_updatedDate").and_then(normalize_date);

    for (key, value) in content {
        if is_system_key(key) {
            continue;
        }
        if key == "isActive" {
            if let Some(b) = value.as_bool() {
                record.is_active = Some(b);
                continue;
            }
        }
        record.fields.insert(key.clone(), value.clone());
    }
    Some(record)
}

fn system_value<'a>(
    content: &'a Map<String, JsonValue>,
    raw: &'a Map<String, JsonValue>,
    key: &str,
) -> Option<&'a JsonValue> {
    content.get(key).or_else(|| raw.get(key))
}

fn string_field(map: &Map<String, JsonValue>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accepts `"2024-01-02T03:04:05Z"` or `{"$date": "..."}`; RFC 3339 values
/// are normalized to UTC, anything else is passed through as-is.
fn normalize_date(value: &JsonValue) -> Option<String> {
    let raw = match value {
        JsonValue::String(s) => s.as_str(),
        JsonValue::Object(o) => o.get("$date")?.as_str()?,
        _ => return None,
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true)),
        Err(_) => Some(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: JsonValue) -> Map<String, JsonValue> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn data_envelope_items_are_flattened() {
        let raw = obj(json!({
            "id": "p1",
            "dataCollectionId": "ProductDetail",
            "data": {
                "_id": "p1",
                "_owner": "owner-1",
                "_createdDate": {"$date": "2024-03-01T10:00:00+02:00"},
                "name": "Ginger",
                "isActive": true
            }
        }));
        let rec = normalize_item(&raw, ItemLayout::Detect).unwrap();
        assert_eq!(rec.id, "p1");
        assert_eq!(rec.owner_id.as_deref(), Some("owner-1"));
        assert_eq!(rec.created_at.as_deref(), Some("2024-03-01T08:00:00.000Z"));
        assert_eq!(rec.is_active, Some(true));
        assert_eq!(rec.to_json(), json!({
            "id": "p1",
            "ownerId": "owner-1",
            "createdAt": "2024-03-01T08:00:00.000Z",
            "isActive": true,
            "name": "Ginger"
        }));
    }

    #[test]
    fn items_without_data_use_top_level_fields() {
        let raw = obj(json!({"_id": "img-1", "image": "a.jpg", "data": {}}));
        let rec = normalize_item(&raw, ItemLayout::Detect).unwrap();
        assert_eq!(rec.id, "img-1");
        assert_eq!(rec.get_str("image"), Some("a.jpg"));
        assert!(rec.get("data").is_none());
    }

    #[test]
    fn top_level_layout_ignores_data_envelope() {
        let raw = obj(json!({"id": "x", "alt": "top", "data": {"alt": "nested"}}));
        let rec = normalize_item(&raw, ItemLayout::TopLevel).unwrap();
        assert_eq!(rec.get_str("alt"), Some("top"));
    }

    #[test]
    fn items_without_ids_are_dropped() {
        let raw = obj(json!({"data": {"title": "orphan"}}));
        assert!(normalize_item(&raw, ItemLayout::Detect).is_none());
    }

    #[test]
    fn request_body_matches_wire_format() {
        let options = QueryOptions::default().with_filter(json!({"reference": {"$eq": "a1"}}));
        let body = serde_json::to_value(QueryRequest::new("CoreValues", &options)).unwrap();
        assert_eq!(body, json!({
            "dataCollectionId": "CoreValues",
            "includeReferencedItems": true,
            "returnTotalCount": true,
            "cursorPaging": {"limit": 100},
            "filter": {"reference": {"$eq": "a1"}}
        }));
    }

    #[test]
    fn selected_references_are_listed_by_field() {
        let options = QueryOptions {
            references_to_include: ReferenceInclusion::Fields(
                ["products".to_string(), "featuredProduct".to_string()].into(),
            ),
            ..QueryOptions::default().with_limit(5)
        };
        let body = serde_json::to_value(QueryRequest::new("ProductCatalog", &options)).unwrap();
        assert_eq!(body, json!({
            "dataCollectionId": "ProductCatalog",
            "includeReferencedItems": true,
            "returnTotalCount": true,
            "referencedItemOptions": [{"fieldName": "featuredProduct"}, {"fieldName": "products"}],
            "cursorPaging": {"limit": 5}
        }));

        let wildcard = QueryOptions {
            references_to_include: ReferenceInclusion::Fields(["*".to_string()].into()),
            ..QueryOptions::default()
        };
        let body = serde_json::to_value(QueryRequest::new("ProductCatalog", &wildcard)).unwrap();
        assert_eq!(body["includeReferencedItems"], json!(true));
        assert!(body.get("referencedItemOptions").is_none());

        let none = QueryOptions {
            references_to_include: ReferenceInclusion::None,
            ..QueryOptions::default()
        };
        let body = serde_json::to_value(QueryRequest::new("ProductCatalog", &none)).unwrap();
        assert_eq!(body["includeReferencedItems"], json!(false));
    }

    #[test]
    fn envelope_counts_follow_items_and_paging() {
        let envelope: QueryEnvelope = serde_json::from_value(json!({
            "dataItems": [
                {"id": "a", "data": {"title": "A"}},
                {"id": "b", "data": {"title": "B"}}
            ],
            "pagingMetadata": {"count": 2, "total": 7, "tooManyToCount": false, "hasNext": true}
        }))
        .unwrap();
        let resp = envelope.into_response(ItemLayout::Detect);
        assert_eq!(resp.count, 2);
        assert_eq!(resp.total_count, 7);
        assert!(resp.has_next);
    }
}
