use crate::transport::http::types::{AppState, HealthResponse};
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        credentials_configured: state.aggregator.config().has_credentials(),
    })
}
