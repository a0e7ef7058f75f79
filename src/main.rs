//! Fetches one collection and prints its denormalized view as JSON.
//!
//! ```bash
//! RESOURCE_STORE_BASE_URL=http://localhost:3000 cargo run -- comments post=abc
//! ```

use resource_store::{create_resource_module, setup_tracing, PathSegments};
use tracing::{error, info, Instrument};

const BASE_URL_VAR: &str = "RESOURCE_STORE_BASE_URL";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

fn usage() -> String {
    format!("usage: resource-store <resource> [parent=id ...]   ({BASE_URL_VAR} sets the API base URL)")
}

fn parse_segments(args: impl Iterator<Item = String>) -> Result<PathSegments, String> {
    let mut segments = PathSegments::new();
    for arg in args {
        let (parent, id) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected parent=id, got `{arg}`\n{}", usage()))?;
        segments.insert(parent, id);
    }
    Ok(segments)
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let mut args = std::env::args().skip(1);
    let resource_name = args.next().ok_or_else(usage)?;
    let segments = parse_segments(args)?;
    let base_url = std::env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    info!(resource = %resource_name, %base_url, "Starting");
    let module = create_resource_module(&resource_name, &base_url, None);

    let span = tracing::info_span!("demo_fetch");
    module.fetch_resources(&segments).instrument(span).await;

    if let Some(failure) = module.error() {
        error!(%failure, "Fetch failed");
        module.shutdown().await;
        return Err(failure.to_string());
    }

    let rendered = serde_json::to_string_pretty(&module.denormalized()).map_err(|e| e.to_string())?;
    println!("{rendered}");

    module.shutdown().await;
    info!("Done");
    Ok(())
}
