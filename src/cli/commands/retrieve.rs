//! Retrieve command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::retrieval::PartyRetriever;
use anyhow::Result;

/// Search the built-in party-idea corpus.
pub fn run_retrieve(query: &str, limit: Option<usize>, settings: &Settings) -> Result<()> {
    let retriever = PartyRetriever::new(&settings.retrieval)?;
    let ideas = retriever.retrieve_k(query, limit.unwrap_or(retriever.top_k()));

    if ideas.is_empty() {
        Output::info("No party ideas found.");
        return Ok(());
    }

    Output::header(&format!("Ideas for: {}", query));
    for idea in &ideas {
        Output::idea(idea);
    }
    println!();

    Ok(())
}
