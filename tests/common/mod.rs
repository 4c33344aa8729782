//! In-process mock of the CMS data-query endpoint.
//!
//! Serves configured items per collection id in the CMS envelope format,
//! applies simple `$eq` filters, and counts hits per collection so tests can
//! assert on retry and fan-out behaviour.

#![allow(dead_code)]

use agri_content_service::infra::cms::client::{QUERY_PATH, SITE_ID_HEADER};
use agri_content_service::CmsConfig;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_SITE: &str = "test-site";

#[derive(Clone, Debug)]
pub enum Behavior {
    /// Raw `data` objects; each must carry `_id`.
    Items(Vec<JsonValue>),
    Fail(u16, String),
}

#[derive(Clone, Debug)]
pub struct SeenRequest {
    pub collection_id: String,
    pub authorization: Option<String>,
    pub site_id: Option<String>,
    pub body: JsonValue,
}

#[derive(Clone, Default)]
pub struct MockCms {
    behaviors: Arc<Mutex<HashMap<String, Behavior>>>,
    hits: Arc<Mutex<HashMap<String, u32>>>,
    requests: Arc<Mutex<Vec<SeenRequest>>>,
    ignore_filters: Arc<AtomicBool>,
    top_level: Arc<Mutex<Vec<String>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
}

impl MockCms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, collection_id: &str, behavior: Behavior) -> &Self {
        self.behaviors
            .lock()
            .unwrap()
            .insert(collection_id.to_string(), behavior);
        self
    }

    pub fn items(&self, collection_id: &str, items: Vec<JsonValue>) -> &Self {
        self.set(collection_id, Behavior::Items(items))
    }

    pub fn fail(&self, collection_id: &str, status: u16, body: &str) -> &Self {
        self.set(collection_id, Behavior::Fail(status, body.to_string()))
    }

    /// Serve every item regardless of the request filter.
    pub fn ignore_filters(&self) -> &Self {
        self.ignore_filters.store(true, Ordering::SeqCst);
        self
    }

    /// Serve this collection's items without a `data` envelope.
    pub fn top_level(&self, collection_id: &str) -> &Self {
        self.top_level.lock().unwrap().push(collection_id.to_string());
        self
    }

    /// Hold every response for this collection before answering.
    pub fn delay(&self, collection_id: &str, delay: Duration) -> &Self {
        self.delays
            .lock()
            .unwrap()
            .insert(collection_id.to_string(), delay);
        self
    }

    pub fn hits(&self, collection_id: &str) -> u32 {
        self.hits
            .lock()
            .unwrap()
            .get(collection_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_hits(&self) -> u32 {
        self.hits.lock().unwrap().values().sum()
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, collection_id: &str, headers: &HeaderMap, body: &JsonValue) {
        *self
            .hits
            .lock()
            .unwrap()
            .entry(collection_id.to_string())
            .or_insert(0) += 1;
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(SeenRequest {
            collection_id: collection_id.to_string(),
            authorization: header("authorization"),
            site_id: header(SITE_ID_HEADER),
            body: body.clone(),
        });
    }
}

fn matches_filter(item: &JsonValue, filter: Option<&JsonValue>) -> bool {
    let Some(conditions) = filter.and_then(|f| f.as_object()) else {
        return true;
    };
    conditions.iter().all(|(field, cond)| match cond.get("$eq") {
        Some(expected) => item.get(field) == Some(expected),
        None => item.get(field) == Some(cond),
    })
}

async fn query_handler(
    State(mock): State<MockCms>,
    headers: HeaderMap,
    Json(body): Json<JsonValue>,
) -> Response {
    let collection_id = body["dataCollectionId"].as_str().unwrap_or_default().to_string();
    mock.record(&collection_id, &headers, &body);
    let delay = mock.delays.lock().unwrap().get(&collection_id).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let behavior = mock.behaviors.lock().unwrap().get(&collection_id).cloned();
    match behavior {
        None => (StatusCode::NOT_FOUND, "collection not found").into_response(),
        Some(Behavior::Fail(status, text)) => {
            (StatusCode::from_u16(status).unwrap(), text).into_response()
        }
        Some(Behavior::Items(items)) => {
            let filter = if mock.ignore_filters.load(Ordering::SeqCst) {
                None
            } else {
                body.get("filter")
            };
            let matching: Vec<&JsonValue> =
                items.iter().filter(|i| matches_filter(i, filter)).collect();
            let limit = body["cursorPaging"]["limit"].as_u64().unwrap_or(100) as usize;
            let flat = mock.top_level.lock().unwrap().contains(&collection_id);
            let page: Vec<JsonValue> = matching
                .iter()
                .take(limit)
                .map(|data| {
                    if flat {
                        let mut item = (*data).clone();
                        item["id"] = data["_id"].clone();
                        item
                    } else {
                        json!({"id": data["_id"], "dataCollectionId": collection_id, "data": data})
                    }
                })
                .collect();
            Json(json!({
                "dataItems": page,
                "pagingMetadata": {
                    "count": page.len(),
                    "total": matching.len(),
                    "tooManyToCount": false,
                    "hasNext": matching.len() > page.len()
                }
            }))
            .into_response()
        }
    }
}

/// Starts the mock on an ephemeral port and returns its base URL.
pub async fn spawn_mock_cms(mock: MockCms) -> String {
    let router = Router::new()
        .route(QUERY_PATH, post(query_handler))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Credentials set, short backoff, cache off.
pub fn test_config(base_url: &str) -> CmsConfig {
    CmsConfig {
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(40),
        request_timeout: Duration::from_secs(5),
        secondary_timeout: Duration::from_secs(5),
        cache_ttl: Duration::ZERO,
        ..CmsConfig::default()
            .with_credentials(TEST_TOKEN, TEST_SITE)
            .with_base_url(base_url)
    }
}

/// A complete, healthy site.
pub fn seed_site(mock: &MockCms) {
    mock.items(
        "Hero",
        vec![json!({"_id": "hero-1", "title": "Quality produce from West Africa", "isActive": true})],
    )
    .items(
        "About",
        vec![json!({"_id": "a1", "title": "About us", "description": "Importers since 2009"})],
    )
    .items(
        "CoreValues",
        vec![
            json!({"_id": "v1", "title": "Quality", "reference": "a1"}),
            json!({"_id": "v2", "title": "Integrity", "reference": "a1"}),
            json!({"_id": "v3", "title": "Elsewhere", "reference": "other"}),
        ],
    )
    .items(
        "Services",
        vec![
            json!({"_id": "s1", "title": "Sourcing"}),
            json!({"_id": "s2", "title": "Logistics"}),
        ],
    )
    .items(
        "ProductCatalog",
        vec![
            json!({"_id": "c1", "name": "Spices", "productReferences": ["p1", "p9"]}),
            json!({"_id": "c2", "name": "Beans"}),
        ],
    )
    .items(
        "ProductDetail",
        vec![
            json!({"_id": "p1", "name": "Ginger"}),
            json!({"_id": "p2", "name": "Cocoa"}),
        ],
    )
    .items("Contact", vec![json!({"_id": "contact-1", "email": "sales@example.com"})])
    .items("CarouselImage", vec![json!({"_id": "img-1", "image": "a.jpg"})])
    .top_level("CarouselImage");
}
