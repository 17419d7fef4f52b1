//! CLI module for Alfred.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Alfred - party-planning agent toolbox
///
/// Typed party-planning tools, a BM25 idea retriever and a tool-calling LLM
/// agent, usable from the command line, over MCP or over HTTP.
#[derive(Parser, Debug)]
#[command(name = "alfred")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "ALFRED_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List or invoke registered tools
    Tools {
        #[command(subcommand)]
        action: ToolsAction,
    },

    /// Estimate cargo flight time between two coordinates
    Travel {
        /// Origin as "lat,lon"
        #[arg(long, allow_hyphen_values = true)]
        from: String,

        /// Destination as "lat,lon"
        #[arg(long, allow_hyphen_values = true)]
        to: String,

        /// Cruising speed in km/h (defaults to the configured speed)
        #[arg(short, long)]
        speed: Option<f64>,
    },

    /// Search the party-idea knowledge base
    Retrieve {
        /// Search query
        query: String,

        /// Maximum number of ideas
        #[arg(short = 'k', long)]
        limit: Option<usize>,
    },

    /// Run the agent on a task
    Agent {
        /// The task for the agent (e.g., "Plan a superhero party menu")
        task: String,

        /// Extra context passed along with the task
        #[arg(long)]
        context: Option<String>,

        /// Model provider (openai, mistral, deepseek)
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum model calls
        #[arg(long)]
        max_steps: Option<usize>,
    },

    /// Start HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start MCP server on stdio for AI assistant integration
    Mcp,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ToolsAction {
    /// List registered tools and their inputs
    List,

    /// Invoke a tool with JSON arguments
    Call {
        /// Tool name
        name: String,

        /// JSON object of arguments
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_travel_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "alfred", "travel", "--from", "41.878,-87.629", "--to", "-33.868,151.209",
        ])
        .unwrap();
        match cli.command {
            Commands::Travel { from, to, speed } => {
                assert_eq!(from, "41.878,-87.629");
                assert_eq!(to, "-33.868,151.209");
                assert!(speed.is_none());
            }
            _ => panic!("Expected Travel command"),
        }
    }

    #[test]
    fn test_parse_tools_call() {
        let cli = Cli::try_parse_from([
            "alfred", "-vv", "tools", "call", "suggest_menu", "--args", r#"{"occasion":"formal"}"#,
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Tools {
                action: ToolsAction::Call { name, args },
            } => {
                assert_eq!(name, "suggest_menu");
                assert_eq!(args, r#"{"occasion":"formal"}"#);
            }
            _ => panic!("Expected tools call"),
        }
    }
}
