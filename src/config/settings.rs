//! Configuration settings for Alfred.

use crate::error::{AlfredError, Result};
use crate::travel::DEFAULT_CRUISING_SPEED_KMH;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub model: ModelSettings,
    pub agent: AgentSettings,
    pub retrieval: RetrievalSettings,
    pub travel: TravelSettings,
    pub server: ServerSettings,
    pub telemetry: TelemetrySettings,
    pub mcp: McpSettings,
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// OpenAI chat completions (default).
    #[default]
    OpenAI,
    /// Mistral's OpenAI-compatible endpoint.
    Mistral,
    /// DeepSeek R1 through the Hugging Face inference router.
    DeepSeek,
}

impl std::str::FromStr for ModelProvider {
    type Err = AlfredError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ModelProvider::OpenAI),
            "mistral" => Ok(ModelProvider::Mistral),
            "deepseek" => Ok(ModelProvider::DeepSeek),
            _ => Err(AlfredError::UnknownModel(s.to_string())),
        }
    }
}

impl std::fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelProvider::OpenAI => write!(f, "openai"),
            ModelProvider::Mistral => write!(f, "mistral"),
            ModelProvider::DeepSeek => write!(f, "deepseek"),
        }
    }
}

/// Model selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Provider (openai, mistral, deepseek).
    pub provider: ModelProvider,
    /// Override the provider's default model id.
    pub model_id: Option<String>,
    /// Override the provider's API base URL.
    pub api_base: Option<String>,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: ModelProvider::OpenAI,
            model_id: None,
            api_base: None,
            max_tokens: 8096,
            timeout_secs: 300,
        }
    }
}

/// Agent loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Maximum model calls per task.
    pub max_steps: usize,
    /// Tools to expose. Empty means every built-in tool.
    pub tools: Vec<String>,
    /// Custom system prompt.
    pub system_prompt: Option<String>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_steps: 10,
            tools: Vec::new(),
            system_prompt: None,
        }
    }
}

/// Party-idea retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of ideas returned per query.
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            top_k: 5,
        }
    }
}

/// Cargo travel estimation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelSettings {
    /// Cruising speed used when a call does not give one, in km/h.
    pub default_cruising_speed_kmh: f64,
}

impl Default for TravelSettings {
    fn default() -> Self {
        Self {
            default_cruising_speed_kmh: DEFAULT_CRUISING_SPEED_KMH,
        }
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// External MCP server whose tools are imported into the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct McpSettings {
    /// Command that starts the server on stdio. No tools are imported if unset.
    pub command: Option<String>,
    pub args: Vec<String>,
    /// Imported tools are registered as `{prefix}_{name}`.
    pub prefix: String,
}

impl Default for McpSettings {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            prefix: "mcp".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Colored output.
    pub ansi: bool,
    /// Include the event target in log lines.
    pub with_target: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            ansi: true,
            with_target: false,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AlfredError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that would otherwise fail deep inside a tool or the agent.
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.chunk_size == 0 {
            return Err(AlfredError::Config("retrieval.chunk_size must be positive".to_string()));
        }
        if self.retrieval.chunk_overlap >= self.retrieval.chunk_size {
            return Err(AlfredError::Config(format!(
                "retrieval.chunk_overlap ({}) must be smaller than retrieval.chunk_size ({})",
                self.retrieval.chunk_overlap, self.retrieval.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(AlfredError::Config("retrieval.top_k must be at least 1".to_string()));
        }

        let speed = self.travel.default_cruising_speed_kmh;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(AlfredError::Config(format!(
                "travel.default_cruising_speed_kmh must be positive, got {}",
                speed
            )));
        }

        if self.agent.max_steps == 0 {
            return Err(AlfredError::Config("agent.max_steps must be at least 1".to_string()));
        }

        if self.mcp.command.is_some() && self.mcp.prefix.is_empty() {
            return Err(AlfredError::Config("mcp.prefix must not be empty".to_string()));
        }

        if let Some(base) = &self.model.api_base {
            url::Url::parse(base)
                .map_err(|e| AlfredError::Config(format!("model.api_base '{}': {}", base, e)))?;
        }

        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("alfred")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.retrieval.chunk_size, 500);
        assert_eq!(settings.retrieval.chunk_overlap, 50);
        assert_eq!(settings.retrieval.top_k, 5);
        assert_eq!(settings.travel.default_cruising_speed_kmh, 750.0);
        assert_eq!(settings.model.max_tokens, 8096);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [model]
            provider = "mistral"

            [agent]
            max_steps = 20
            tools = ["suggest_menu"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.model.provider, ModelProvider::Mistral);
        assert_eq!(settings.agent.max_steps, 20);
        assert_eq!(settings.agent.tools, vec!["suggest_menu".to_string()]);
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_mcp_section() {
        let settings: Settings = toml::from_str(
            r#"
            [mcp]
            command = "npx"
            args = ["-y", "@modelcontextprotocol/server-everything"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.mcp.command.as_deref(), Some("npx"));
        assert_eq!(settings.mcp.args.len(), 2);
        assert_eq!(settings.mcp.prefix, "mcp");
        assert!(Settings::default().mcp.command.is_none());

        let mut settings = settings;
        settings.mcp.prefix = String::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.retrieval.chunk_overlap = 500;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.travel.default_cruising_speed_kmh = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.agent.max_steps = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.model.api_base = Some("not a url".to_string());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.model.provider = ModelProvider::DeepSeek;
        settings.server.port = 8080;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.model.provider, ModelProvider::DeepSeek);
        assert_eq!(loaded.server.port, 8080);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded.agent.max_steps, 10);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("Mistral".parse::<ModelProvider>().unwrap(), ModelProvider::Mistral);
        let err = "llama".parse::<ModelProvider>().unwrap_err();
        assert_eq!(err.to_string(), "Model llama not found.");
    }
}
