//! CLI output formatting utilities.

use crate::retrieval::RetrievedIdea;
use crate::tools::ToolSpec;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a tool with its inputs.
    pub fn tool(spec: &ToolSpec) {
        println!(
            "  {} {} -> {:?}",
            style("*").cyan(),
            style(&spec.name).bold(),
            spec.output_type
        );
        println!("    {}", style(content_preview(&spec.description, 100)).dim());
        for input in &spec.inputs {
            let marker = if input.required { "" } else { "?" };
            println!(
                "    {}{}: {}",
                input.name,
                marker,
                style(input.kind.as_str()).cyan()
            );
        }
    }

    /// Print a retrieved idea.
    pub fn idea(idea: &RetrievedIdea) {
        println!(
            "\n{} {} (score: {:.2})",
            style(format!("{}.", idea.rank)).green(),
            style(&idea.source).bold(),
            idea.score
        );
        println!("   {}", content_preview(&idea.content, 200));
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis, on a character boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short", 10), "short");
        assert_eq!(content_preview("line one\nline two", 100), "line one line two");
        assert_eq!(content_preview("héllo wörld", 5), "héllo...");
    }
}
