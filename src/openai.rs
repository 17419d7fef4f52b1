//! OpenAI-compatible client construction.

use crate::agent::ModelProfile;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};

/// Create a chat client for a model profile, with the profile's timeout.
pub fn create_client(profile: &ModelProfile) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(profile.timeout)
        .build()?;

    let mut config = OpenAIConfig::new().with_api_key(profile.api_key()?);
    if let Some(base) = &profile.api_base {
        config = config.with_api_base(base);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}
