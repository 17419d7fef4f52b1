//! Alfred CLI entry point.

use alfred::cli::{commands, Cli, Commands};
use alfred::config::Settings;
use alfred::telemetry::{Telemetry, TelemetryConfig};
use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_deref())?;

    let telemetry = Telemetry::init(&TelemetryConfig::from_settings(
        &settings.telemetry,
        cli.verbose,
    ))?;

    // Execute command
    match &cli.command {
        Commands::Tools { action } => {
            commands::run_tools(action, &settings)?;
        }

        Commands::Travel { from, to, speed } => {
            commands::run_travel(from, to, *speed, &settings)?;
        }

        Commands::Retrieve { query, limit } => {
            commands::run_retrieve(query, *limit, &settings)?;
        }

        Commands::Agent {
            task,
            context,
            model,
            max_steps,
        } => {
            commands::run_agent(
                task,
                context.as_deref(),
                model.as_deref(),
                *max_steps,
                settings,
            )
            .await?;
        }

        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| settings.server.host.clone());
            let port = port.unwrap_or(settings.server.port);
            commands::run_serve(&host, port, settings).await?;
        }

        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    telemetry.shutdown();
    Ok(())
}
