//! Agent system for task execution with tool calling.
//!
//! Provides an LLM agent that uses the tool registry to plan Alfred's
//! party: menus, themes, catering, deliveries and idea retrieval.

mod models;
mod runner;

pub use models::ModelProfile;
pub use runner::{Agent, AgentEvent, AgentResponse, ToolCallRecord};
