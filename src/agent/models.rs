//! Model provider profiles.
//!
//! Every supported provider speaks the OpenAI chat-completions protocol; a
//! profile records where to send requests and which key to send.

use crate::config::{ModelProvider, ModelSettings};
use crate::error::{AlfredError, Result};
use std::time::Duration;

/// Resolved connection details for a chat model.
#[derive(Debug, Clone)]
pub struct ModelProfile {
    pub provider: ModelProvider,
    pub model_id: String,
    /// `None` uses the OpenAI default endpoint.
    pub api_base: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: &'static str,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl ModelProfile {
    /// Resolve the configured provider, applying overrides.
    pub fn from_settings(settings: &ModelSettings) -> Self {
        Self::for_provider(settings.provider, settings)
    }

    /// Resolve a specific provider, applying overrides from settings.
    pub fn for_provider(provider: ModelProvider, settings: &ModelSettings) -> Self {
        let (model_id, api_base, api_key_env) = match provider {
            ModelProvider::OpenAI => ("gpt-4o-mini", None, "OPENAI_API_KEY"),
            ModelProvider::Mistral => (
                "mistral-medium-latest",
                Some("https://api.mistral.ai/v1"),
                "MISTRAL_API_KEY",
            ),
            ModelProvider::DeepSeek => (
                "deepseek-ai/DeepSeek-R1",
                Some("https://router.huggingface.co/v1"),
                "HF_TOKEN",
            ),
        };

        // Overrides only make sense for the provider they were written for.
        let overrides = provider == settings.provider;

        Self {
            provider,
            model_id: settings
                .model_id
                .clone()
                .filter(|_| overrides)
                .unwrap_or_else(|| model_id.to_string()),
            api_base: settings
                .api_base
                .clone()
                .filter(|_| overrides)
                .or_else(|| api_base.map(str::to_string)),
            api_key_env,
            max_tokens: settings.max_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    /// Resolve a provider by name (e.g. from a `--model` flag).
    pub fn by_name(name: &str, settings: &ModelSettings) -> Result<Self> {
        let provider: ModelProvider = name.parse()?;
        Ok(Self::for_provider(provider, settings))
    }

    /// Read the API key from the environment.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(self.api_key_env) {
            Ok(key) if !key.is_empty() => Ok(key),
            Ok(_) => Err(AlfredError::Config(format!(
                "{} is empty. Set it with: export {}='...'",
                self.api_key_env, self.api_key_env
            ))),
            Err(_) => Err(AlfredError::Config(format!(
                "{} not set. Set it with: export {}='...'",
                self.api_key_env, self.api_key_env
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        let settings = ModelSettings::default();

        let openai = ModelProfile::for_provider(ModelProvider::OpenAI, &settings);
        assert_eq!(openai.model_id, "gpt-4o-mini");
        assert!(openai.api_base.is_none());

        let mistral = ModelProfile::for_provider(ModelProvider::Mistral, &settings);
        assert_eq!(mistral.model_id, "mistral-medium-latest");
        assert_eq!(mistral.api_key_env, "MISTRAL_API_KEY");
        assert_eq!(mistral.max_tokens, 8096);

        let deepseek = ModelProfile::for_provider(ModelProvider::DeepSeek, &settings);
        assert_eq!(deepseek.model_id, "deepseek-ai/DeepSeek-R1");
        assert_eq!(deepseek.api_key_env, "HF_TOKEN");
    }

    #[test]
    fn test_overrides_apply_to_configured_provider_only() {
        let settings = ModelSettings {
            provider: ModelProvider::Mistral,
            model_id: Some("mistral-small-latest".to_string()),
            api_base: Some("http://localhost:8080/v1".to_string()),
            ..ModelSettings::default()
        };

        let mistral = ModelProfile::from_settings(&settings);
        assert_eq!(mistral.model_id, "mistral-small-latest");
        assert_eq!(mistral.api_base.as_deref(), Some("http://localhost:8080/v1"));

        let deepseek = ModelProfile::for_provider(ModelProvider::DeepSeek, &settings);
        assert_eq!(deepseek.model_id, "deepseek-ai/DeepSeek-R1");
        assert_eq!(
            deepseek.api_base.as_deref(),
            Some("https://router.huggingface.co/v1")
        );
    }

    #[test]
    fn test_by_name_rejects_unknown_model() {
        let err = ModelProfile::by_name("gemini", &ModelSettings::default()).unwrap_err();
        assert_eq!(err.to_string(), "Model gemini not found.");
    }
}
