use agri_content_service::{CmsClient, CmsConfig, CollectionName, CollectionSource, QueryOptions};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--strict]\n\
         \n\
         Requires env vars:\n\
           WIX_API_KEY, WIX_SITE_ID\n\
         Optional:\n\
           WIX_API_BASE_URL, WIX_COLLECTION_* overrides\n\
         \n\
         --strict  exit non-zero if any collection query fails\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let strict = args.iter().any(|a| a == "--strict");

    let config = Arc::new(CmsConfig::from_env());
    println!("> Preflight:");
    println!("  WIX_API_BASE_URL={}", config.base_url);
    println!("  WIX_API_KEY={}", if config.api_token.is_some() { "<set>" } else { "<missing>" });
    println!("  WIX_SITE_ID={}", config.site_id.as_deref().unwrap_or("<missing>"));
    let required: Vec<String> = config.required_sections.iter().map(|c| c.to_string()).collect();
    println!("  required sections: {}", required.join(", "));

    if !config.has_credentials() {
        println!("> Credentials missing: the API will serve mock content for every section.");
        if strict {
            anyhow::bail!("CMS credentials are not configured");
        }
        return Ok(());
    }

    let client = CmsClient::new(config.clone())?;
    let options = QueryOptions::default().with_limit(1);
    let checks = CollectionName::ALL.into_iter().map(|collection| {
        let client = &client;
        let options = &options;
        async move {
            let started = Instant::now();
            let result = client.query(collection, options).await;
            (collection, started.elapsed(), result)
        }
    });

    let mut failures = 0usize;
    for (collection, elapsed, result) in join_all(checks).await {
        let id = config.collection_id(collection);
        match result {
            Ok(resp) => println!(
                "  [ok]   {:<16} {:<20} total={:<5} ({} ms)",
                collection.slug(),
                id,
                resp.total_count,
                elapsed.as_millis()
            ),
            Err(e) => {
                failures += 1;
                println!("  [fail] {:<16} {:<20} {}", collection.slug(), id, e);
            }
        }
    }

    if failures == 0 {
        println!("> All {} collections reachable.", CollectionName::ALL.len());
    } else {
        println!("> {} of {} collections failed.", failures, CollectionName::ALL.len());
        if strict {
            anyhow::bail!("{failures} collection queries failed");
        }
    }
    Ok(())
}
