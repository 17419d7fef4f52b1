//! Configuration module for Alfred.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    AgentSettings, McpSettings, ModelProvider, ModelSettings, RetrievalSettings, ServerSettings,
    Settings, TelemetrySettings, TravelSettings,
};
