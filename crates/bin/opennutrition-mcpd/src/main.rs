//! Daemon entry point for the OpenNutrition MCP server.
//!
//! Loads configuration from the command line and environment, opens the food
//! store, optionally imports the dataset, and serves MCP over the selected
//! transport.

mod config;
mod store;

use std::sync::Arc;

use nutrition_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use nutrition_mcp::tools::ToolDispatcher;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{NutritionConfig, Transport};
use crate::store::{import_configured_dataset, open_control_plane};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Logs go to stderr; stdout belongs to the stdio transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = NutritionConfig::from_args()?;
    let control = open_control_plane(&config).await?;
    import_configured_dataset(&control, &config).await?;

    match control.store().count_foods().await {
        Ok(0) => warn!("food store is empty; pass --import-path to load the dataset"),
        Ok(count) => info!(count, "food store ready"),
        Err(err) => warn!("unable to count foods: {err}"),
    }

    let dispatcher = Arc::new(ToolDispatcher::new(control));
    match config.transport {
        Transport::Stdio => serve_stdio(dispatcher).await,
        Transport::StreamableHttp => {
            let http_config = McpHttpServerConfig::new(config.mcp_http_addr, config.stateful_mode);
            serve_streamable_http(dispatcher, http_config).await
        }
    }
}
