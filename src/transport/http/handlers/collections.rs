use crate::domain::collection::CollectionName;
use crate::domain::record::CollectionResponse;
use crate::transport::http::types::{ApiError, AppState, ErrorBody};
use axum::extract::{Path, State};
use axum::Json;

#[utoipa::path(
    get,
    path = "/collections/{name}",
    params(
        ("name" = String, Path, description = "Collection slug (e.g. hero, categories, products)")
    ),
    responses(
        (status = 200, description = "Normalized collection items", body = CollectionResponse),
        (status = 404, description = "Unknown collection name", body = ErrorBody),
        (status = 500, description = "CMS not configured or fetch failed", body = ErrorBody)
    )
)]
pub async fn get_collection_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CollectionResponse>, ApiError> {
    let collection: CollectionName = name.parse()?;
    let response = state.aggregator.fetch_collection(collection).await?;
    Ok(Json(response))
}
