//! Feedlab
//!
//! An MCP server for poultry feed recipe analysis.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use feedlab::build_info;
use feedlab::config::Config;
use feedlab::mcp::FeedlabService;
use feedlab::models::Settings;
use feedlab::store::{load_catalog, Catalog, MemorySettingsStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("feedlab=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env()?;

    let (catalog, catalog_source) = match &config.catalog_path {
        Some(path) => {
            eprintln!("Catalog path: {}", path.display());
            (load_catalog(path)?, path.display().to_string())
        }
        None => (Catalog::default(), "built-in".to_string()),
    };
    eprintln!(
        "Catalog: {} ingredients | Growth phase: {}",
        catalog.len(),
        config.growth_phase.as_str()
    );

    let settings_store = Arc::new(MemorySettingsStore::new(Settings::with_growth_phase(
        config.growth_phase,
    )));

    // Create the Feedlab service
    let service = FeedlabService::new(catalog_source, catalog, settings_store);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
