//! MCP (Model Context Protocol) support for Alfred.
//!
//! The server lets AI assistants call the party-planning tools; the client
//! imports tools from another MCP server into the registry.
//! Both speak JSON-RPC 2.0 over stdio.

mod client;
mod protocol;
mod server;

pub use client::McpClient;
pub use protocol::{JsonRpcRequest, JsonRpcResponse, McpTool, PROTOCOL_VERSION};
pub use server::McpServer;
