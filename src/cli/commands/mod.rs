//! CLI command implementations.

mod agent;
mod config;
mod mcp;
mod retrieve;
mod serve;
mod tools;
mod travel;

pub use agent::run_agent;
pub use config::run_config;
pub use mcp::run_mcp;
pub use retrieve::run_retrieve;
pub use serve::run_serve;
pub use tools::run_tools;
pub use travel::run_travel;
