//! MCP server implementation for the HubSpot CRM.
//!
//! This module provides the MCP protocol server that exposes HubSpot CRM
//! functionality to AI assistants through the Model Context Protocol.

pub mod handlers;

pub use handlers::{HubSpotMcpServer, HubSpotResource};

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the HubSpot MCP server with stdio transport.
///
/// This function starts the MCP server and runs it until the client
/// disconnects. It communicates via stdin/stdout using the MCP protocol.
pub async fn run_server(server: HubSpotMcpServer) -> Result<()> {
    tracing::info!("Server running with stdio transport");
    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    Ok(())
}
