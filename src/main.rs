//! HubSpot MCP Server - Main entry point
//!
//! This is the main executable for the HubSpot MCP Server, which provides a Model Context
//! Protocol (MCP) interface to the HubSpot CRM.

use anyhow::Result;
use clap::Parser;
use hubspot_mcp_server::client::{AsyncHubSpotClient, AsyncHubSpotClientImpl};
use hubspot_mcp_server::{Config, HubSpotClient, HubSpotMcpServer};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// MCP server for the HubSpot CRM.
///
/// Required HubSpot scope: oauth. Optional scopes: crm.objects.contacts.read,
/// crm.objects.contacts.write, crm.objects.companies.read,
/// crm.objects.companies.write.
#[derive(Debug, Parser)]
#[command(name = "hubspot-mcp-server", version)]
struct Cli {
    /// HubSpot private app access token
    #[arg(env = "HUBSPOT_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // .env may carry HUBSPOT_ACCESS_TOKEN, so load it before parsing
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // A bad token is fatal before anything is served
    let config = Config::load(&cli.access_token)?;

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting HubSpot MCP Server with API URL: {}",
        config.api_base_url
    );

    let sync_client = HubSpotClient::new(&config);
    let client =
        Arc::new(AsyncHubSpotClientImpl::new(sync_client)) as Arc<dyn AsyncHubSpotClient>;

    let server = HubSpotMcpServer::new(client);
    info!("HubSpot MCP Server initialized");

    hubspot_mcp_server::server::run_server(server).await?;

    info!("HubSpot MCP Server shutdown complete");
    Ok(())
}
