//! One-shot content dump.
//!
//! Runs a single aggregation pass against the configured CMS and prints the
//! result as JSON. `--homepage` prints the extracted homepage projection
//! instead; `--heuristic` resolves category references by field name.

use agri_content_service::domain::ReferenceSchema;
use agri_content_service::{extract_homepage, CmsClient, CmsConfig, ContentAggregator};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let homepage = args.iter().any(|a| a == "--homepage");
    let heuristic = args.iter().any(|a| a == "--heuristic");

    let config = Arc::new(CmsConfig::from_env());
    let client = CmsClient::new(config.clone())?;
    let mut aggregator = ContentAggregator::new(Arc::new(client), config);
    if heuristic {
        aggregator = aggregator.with_reference_schema(ReferenceSchema::NameHeuristic);
    }

    let output = match aggregator.fetch_all().await {
        Ok(content) if homepage => serde_json::to_string_pretty(&extract_homepage(Some(&content), true))?,
        Ok(content) => serde_json::to_string_pretty(&content)?,
        Err(e) if homepage => {
            eprintln!("> Aggregation failed ({e}); printing static homepage.");
            serde_json::to_string_pretty(&extract_homepage(None, false))?
        }
        Err(e) => return Err(e.into()),
    };
    println!("{output}");
    Ok(())
}
