// src/bin/api_server.rs

use agri_content_service::transport;
use agri_content_service::{CmsClient, CmsConfig, ContentAggregator};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hyper=warn,reqwest=warn".into()),
        )
        .init();

    // --- Configuration ---
    let config = Arc::new(CmsConfig::from_env());
    println!("> CMS endpoint: {}", config.base_url);
    if config.has_credentials() {
        println!("> CMS credentials configured; serving live content.");
    } else {
        println!("> WIX_API_KEY / WIX_SITE_ID not set; every section will serve mock content.");
    }
    println!(
        "> Retry policy: {} attempts, backoff {:?}..{:?}, cache TTL {:?}",
        config.max_attempts, config.base_delay, config.max_delay, config.cache_ttl
    );

    // --- Aggregator Initialization ---
    let client = CmsClient::new(config.clone())?;
    let aggregator = ContentAggregator::new(Arc::new(client), config.clone());
    let app_state = transport::http::AppState::new(aggregator);

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    println!("> API server listening on http://{}", config.bind_addr);
    println!("> Swagger UI available at http://{}/swagger-ui", config.bind_addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n> Shutdown signal received (Ctrl+C).");
        }
    }

    Ok(())
}
