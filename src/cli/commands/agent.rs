//! Agent command implementation.

use crate::agent::{Agent, ModelProfile};
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::tools::ToolRegistry;
use anyhow::Result;
use std::sync::Arc;

/// Run the agent command.
pub async fn run_agent(
    task: &str,
    context: Option<&str>,
    model: Option<&str>,
    max_steps: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let profile = match model {
        Some(name) => ModelProfile::by_name(name, &settings.model)?,
        None => ModelProfile::from_settings(&settings.model),
    };

    if let Err(e) = preflight::check_agent(&profile) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let tools = Arc::new(ToolRegistry::from_settings(&settings)?);
    let mut agent = Agent::from_settings(tools, profile, &settings)?;
    if let Some(max) = max_steps {
        agent = agent.with_max_steps(max);
    }

    let spinner = Output::spinner(&format!("Alfred is working ({})...", agent.model_id()));

    match agent.run(task, context).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::info(&truncate(&call.to_string(), 80));
                }
                println!();
            }

            Output::info(&format!(
                "Completed in {} step(s), {:.1}s",
                response.steps,
                response.elapsed().num_milliseconds() as f64 / 1000.0
            ));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }
}
