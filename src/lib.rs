//! Alfred - party-planning agent toolbox
//!
//! A set of small, typed party-planning tools, a keyword retriever over a
//! built-in knowledge base of party ideas, and a tool-calling LLM agent that
//! uses them.
//!
//! # Overview
//!
//! Alfred allows you to:
//! - Estimate cargo flight times between coordinates
//! - Look up menus, catering services and superhero party themes
//! - Search party ideas with BM25 ranking
//! - Hand a task to an agent backed by OpenAI, Mistral or DeepSeek models
//! - Expose every tool over MCP (stdio) or an HTTP API
//! - Import the tools of another MCP server
//!
//! # Architecture
//!
//! - `travel` - Great-circle travel time estimation
//! - `party` - Static party-planning lookups
//! - `retrieval` - Text splitting and BM25 ranking
//! - `tools` - Tool contract, schemas and registry
//! - `agent` - Model profiles and the tool-calling loop
//! - `mcp` - Model Context Protocol server and client
//! - `config` - Configuration management
//! - `telemetry` - Logging setup
//!
//! # Example
//!
//! ```rust
//! use alfred::config::Settings;
//! use alfred::tools::ToolRegistry;
//! use serde_json::json;
//!
//! let registry = ToolRegistry::builtin(&Settings::default())?;
//! let hours = registry.invoke(
//!     "calculate_cargo_travel_time",
//!     &json!({
//!         "origin_coords": [41.8781, -87.6298],
//!         "destination_coords": [-33.8688, 151.2093],
//!     }),
//! )?;
//! assert_eq!(hours.as_number(), Some(22.82));
//! # Ok::<(), alfred::AlfredError>(())
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod openai;
pub mod party;
pub mod retrieval;
pub mod telemetry;
pub mod tools;
pub mod travel;

pub use error::{AlfredError, Result};
