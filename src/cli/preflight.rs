//! Pre-flight checks before operations that need external services.
//!
//! Validates that credentials are available before starting an agent run
//! that would otherwise fail on its first model call.

use crate::agent::ModelProfile;
use crate::error::Result;
use tracing::debug;

/// Check that the agent can reach its model provider.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check_agent(profile: &ModelProfile) -> Result<()> {
    profile.api_key()?;
    debug!(
        "Preflight ok: {} via {}",
        profile.model_id,
        profile.api_base.as_deref().unwrap_or("default endpoint")
    );
    Ok(())
}
