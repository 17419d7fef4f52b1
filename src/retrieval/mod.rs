//! Party-idea retrieval.
//!
//! A fixed knowledge base of party ideas is split into chunks and indexed
//! with BM25. Queries return the best matching ideas with their source.

mod bm25;
mod corpus;
mod splitter;

pub use bm25::{Bm25Index, Bm25Params, Scored, Tokenizer};
pub use corpus::party_ideas;
pub use splitter::{RecursiveSplitter, DEFAULT_SEPARATORS};

use crate::config::RetrievalSettings;
use crate::error::{AlfredError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// A source document before splitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Document text.
    pub text: String,
    /// Label of the collection the document came from.
    pub source: String,
}

impl SourceDocument {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// A chunk of a source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content of this chunk.
    pub content: String,
    /// Source label inherited from the document.
    pub source: String,
    /// Character offset of the chunk within its document.
    pub start_index: usize,
}

/// A ranked retrieval hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedIdea {
    /// 1-based rank.
    pub rank: usize,
    pub content: String,
    pub source: String,
    /// BM25 score (higher is better).
    pub score: f64,
}

/// BM25 retriever over the party-planning knowledge base.
#[derive(Debug, Clone)]
pub struct PartyRetriever {
    index: Bm25Index,
    top_k: usize,
}

impl PartyRetriever {
    /// Build a retriever over the built-in party ideas.
    pub fn new(settings: &RetrievalSettings) -> Result<Self> {
        Self::from_documents(&party_ideas(), settings)
    }

    /// Build a retriever over arbitrary documents.
    pub fn from_documents(documents: &[SourceDocument], settings: &RetrievalSettings) -> Result<Self> {
        if settings.chunk_overlap >= settings.chunk_size {
            return Err(AlfredError::Retrieval(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                settings.chunk_overlap, settings.chunk_size
            )));
        }
        if settings.top_k == 0 {
            return Err(AlfredError::Retrieval("top_k must be at least 1".to_string()));
        }

        let splitter = RecursiveSplitter::new(settings.chunk_size, settings.chunk_overlap);
        let chunks = splitter.split_documents(documents);

        info!(
            "Indexed {} documents as {} chunks",
            documents.len(),
            chunks.len()
        );

        Ok(Self {
            index: Bm25Index::new(chunks),
            top_k: settings.top_k,
        })
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Number of indexed chunks.
    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    /// Retrieve the configured number of ideas.
    pub fn retrieve(&self, query: &str) -> Vec<RetrievedIdea> {
        self.retrieve_k(query, self.top_k)
    }

    /// Retrieve at most `k` ideas, never more than the configured limit.
    #[instrument(skip(self), fields(query = %query))]
    pub fn retrieve_k(&self, query: &str, k: usize) -> Vec<RetrievedIdea> {
        let k = k.min(self.top_k);
        let ideas: Vec<RetrievedIdea> = self
            .index
            .top_k(query, k)
            .into_iter()
            .enumerate()
            .filter_map(|(i, scored)| {
                self.index.chunk(scored.index).map(|chunk| RetrievedIdea {
                    rank: i + 1,
                    content: chunk.content.clone(),
                    source: chunk.source.clone(),
                    score: scored.score,
                })
            })
            .collect();

        debug!("Retrieved {} ideas", ideas.len());
        ideas
    }
}

/// Render ideas as numbered blocks for an agent to read.
pub fn format_ideas(ideas: &[RetrievedIdea]) -> String {
    if ideas.is_empty() {
        return "No party ideas found.".to_string();
    }

    let blocks: String = ideas
        .iter()
        .map(|idea| {
            format!(
                "\n\n===== Idea {} ({}) =====\n{}",
                idea.rank, idea.source, idea.content
            )
        })
        .collect();

    format!("Retrieved ideas:{}", blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retriever() -> PartyRetriever {
        PartyRetriever::new(&RetrievalSettings::default()).unwrap()
    }

    #[test]
    fn test_builtin_corpus_is_indexed() {
        // Every built-in idea fits in a single chunk.
        assert_eq!(retriever().chunk_count(), 5);
    }

    #[test]
    fn test_retrieve_at_most_five_with_sources() {
        let retriever = retriever();
        for query in ["superhero party ideas", "", "music", "zzz"] {
            let ideas = retriever.retrieve(query);
            assert!(ideas.len() <= 5);
            assert!(ideas.iter().all(|i| !i.source.is_empty()));
        }
    }

    #[test]
    fn test_catering_query_finds_catering_idea() {
        let ideas = retriever().retrieve("catering dishes smoothie steak");
        assert_eq!(ideas[0].source, "Catering Ideas");
        assert_eq!(ideas[0].rank, 1);
        assert!(ideas.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_retrieve_k_is_capped() {
        let retriever = retriever();
        assert_eq!(retriever.retrieve_k("music", 2).len(), 2);
        assert_eq!(retriever.retrieve_k("music", 50).len(), 5);
    }

    #[test]
    fn test_rejects_bad_settings() {
        let settings = RetrievalSettings {
            chunk_size: 50,
            chunk_overlap: 50,
            top_k: 5,
        };
        assert!(PartyRetriever::new(&settings).is_err());

        let settings = RetrievalSettings {
            top_k: 0,
            ..RetrievalSettings::default()
        };
        assert!(PartyRetriever::new(&settings).is_err());
    }

    #[test]
    fn test_format_ideas() {
        let ideas = vec![RetrievedIdea {
            rank: 1,
            content: "Hire a DJ.".to_string(),
            source: "Entertainment Ideas".to_string(),
            score: 1.2,
        }];
        let text = format_ideas(&ideas);
        assert!(text.starts_with("Retrieved ideas:"));
        assert!(text.contains("===== Idea 1 (Entertainment Ideas) =====\nHire a DJ."));
        assert_eq!(format_ideas(&[]), "No party ideas found.");
    }
}
