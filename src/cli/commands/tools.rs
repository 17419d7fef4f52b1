//! Tools command implementation.

use crate::cli::{Output, ToolsAction};
use crate::config::Settings;
use crate::tools::ToolRegistry;
use anyhow::Result;

/// List or invoke registered tools.
pub fn run_tools(action: &ToolsAction, settings: &Settings) -> Result<()> {
    let registry = ToolRegistry::from_settings(settings)?;

    match action {
        ToolsAction::List => {
            Output::header(&format!("Tools ({})", registry.len()));
            for spec in registry.specs() {
                Output::tool(spec);
            }
        }

        ToolsAction::Call { name, args } => match registry.invoke_json(name, args) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                Output::error(&format!("{}", e));
                return Err(e.into());
            }
        },
    }

    Ok(())
}
