use crate::domain::content::AggregatedContent;
use crate::domain::homepage::{extract_homepage, ExtractedHomepageData};
use crate::transport::http::types::{ApiError, AppState, ErrorBody};
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    get,
    path = "/content",
    responses(
        (status = 200, description = "Every homepage section in one response", body = AggregatedContent),
        (status = 500, description = "A required section failed", body = ErrorBody)
    )
)]
pub async fn get_content_handler(
    State(state): State<AppState>,
) -> Result<Json<AggregatedContent>, ApiError> {
    let content = state.cache.get_or_fetch(&state.aggregator).await?;
    Ok(Json(content.as_ref().clone()))
}

#[utoipa::path(
    get,
    path = "/homepage",
    responses(
        (status = 200, description = "First item of each section, mock content where missing", body = ExtractedHomepageData)
    )
)]
pub async fn get_homepage_handler(State(state): State<AppState>) -> Json<ExtractedHomepageData> {
    // A failed aggregation degrades to the static homepage.
    let content = state.cache.get_or_fetch(&state.aggregator).await.ok();
    Json(extract_homepage(content.as_deref(), content.is_some()))
}
