use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

use farm_dashboard::loader;
use farm_dashboard::mcp::FarmService;

/// Farm MCP server: the crop catalog, crop profiles and the farm board as
/// read-only tools over stdio.
#[derive(Parser, Debug)]
#[command(name = "farm-mcp", version, about)]
struct Cli {
    /// Farm data directory (catalog.yaml, membership.yaml, profiles.md, dashboard.json).
    /// Built-in data is served when omitted.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("farm_dashboard=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let data = loader::load(cli.data_dir.as_deref()).with_context(|| match &cli.data_dir {
        Some(dir) => format!("loading farm data from {}", dir.display()),
        None => "loading built-in farm data".to_string(),
    })?;
    let source = cli
        .data_dir
        .as_ref()
        .map_or_else(|| "built-in".to_string(), |d| d.display().to_string());
    tracing::info!(
        %source,
        crops = data.catalog.item_count(),
        profiles = data.profiles.len(),
        "farm MCP server starting"
    );

    let server = FarmService::new(data)
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "failed to start MCP service"))?;
    server.waiting().await?;

    Ok(())
}
