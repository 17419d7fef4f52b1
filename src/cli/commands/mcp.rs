//! MCP command implementation.

use crate::config::Settings;
use crate::mcp::McpServer;
use crate::tools::ToolRegistry;
use anyhow::Result;
use std::sync::Arc;

/// Run the MCP server on stdio until the client disconnects.
pub async fn run_mcp(settings: Settings) -> Result<()> {
    let server = McpServer::new(Arc::new(ToolRegistry::builtin(&settings)?));
    tokio::task::spawn_blocking(move || server.run_stdio()).await?
}
