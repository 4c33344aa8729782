use crate::domain::content::AggregatedContent;
use crate::domain::homepage::ExtractedHomepageData;
use crate::domain::record::CollectionResponse;
use crate::transport::http::handlers::{collections, content, health};
use crate::transport::http::types::{AppState, ErrorBody, HealthResponse};
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        collections::get_collection_handler,
        content::get_content_handler,
        content::get_homepage_handler
    ),
    components(schemas(
        HealthResponse,
        ErrorBody,
        CollectionResponse,
        AggregatedContent,
        ExtractedHomepageData
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/collections/:name", get(collections::get_collection_handler))
        .route("/content", get(content::get_content_handler))
        .route("/homepage", get(content::get_homepage_handler))
        .with_state(app_state)
}
