//! Okapi BM25 ranking over an in-memory chunk set.

use super::Chunk;
use regex::Regex;
use std::collections::HashMap;

/// BM25 tuning parameters.
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    /// Term frequency saturation.
    pub k1: f64,
    /// Document length normalization.
    pub b: f64,
    /// Floor for negative IDF values, as a fraction of the mean IDF.
    pub epsilon: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.5,
            b: 0.75,
            epsilon: 0.25,
        }
    }
}

/// Lowercasing word tokenizer.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    word_regex: Regex,
}

impl Tokenizer {
    pub fn new() -> Self {
        let word_regex = Regex::new(r"\w+").expect("Invalid regex");
        Self { word_regex }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.word_regex
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// A scored chunk reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    /// Position of the chunk in the index.
    pub index: usize,
    pub score: f64,
}

/// BM25 index built once over a fixed set of chunks.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    chunks: Vec<Chunk>,
    term_freqs: Vec<HashMap<String, usize>>,
    doc_lens: Vec<usize>,
    avg_doc_len: f64,
    idf: HashMap<String, f64>,
    params: Bm25Params,
    tokenizer: Tokenizer,
}

impl Bm25Index {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self::with_params(chunks, Bm25Params::default())
    }

    pub fn with_params(chunks: Vec<Chunk>, params: Bm25Params) -> Self {
        let tokenizer = Tokenizer::new();

        let mut term_freqs = Vec::with_capacity(chunks.len());
        let mut doc_lens = Vec::with_capacity(chunks.len());
        let mut doc_freqs: HashMap<String, usize> = HashMap::new();

        for chunk in &chunks {
            let tokens = tokenizer.tokenize(&chunk.content);
            doc_lens.push(tokens.len());

            let mut freqs: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *freqs.entry(token).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            term_freqs.push(freqs);
        }

        let avg_doc_len = if doc_lens.is_empty() {
            0.0
        } else {
            doc_lens.iter().sum::<usize>() as f64 / doc_lens.len() as f64
        };

        let idf = compute_idf(&doc_freqs, chunks.len(), params.epsilon);

        Self {
            chunks,
            term_freqs,
            doc_lens,
            avg_doc_len,
            idf,
            params,
            tokenizer,
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// Score every chunk against the query, in index order.
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let terms = self.tokenizer.tokenize(query);
        let Bm25Params { k1, b, .. } = self.params;

        self.term_freqs
            .iter()
            .zip(&self.doc_lens)
            .map(|(freqs, &len)| {
                let norm = if self.avg_doc_len > 0.0 {
                    1.0 - b + b * len as f64 / self.avg_doc_len
                } else {
                    1.0
                };
                terms
                    .iter()
                    .map(|term| {
                        let tf = freqs.get(term).copied().unwrap_or(0) as f64;
                        let idf = self.idf.get(term).copied().unwrap_or(0.0);
                        idf * (tf * (k1 + 1.0)) / (tf + k1 * norm)
                    })
                    .sum()
            })
            .collect()
    }

    /// The `k` best chunks, highest score first. Ties keep index order.
    ///
    /// Every chunk is a candidate, so this returns `min(k, len)` results even
    /// when nothing in the query matches.
    pub fn top_k(&self, query: &str, k: usize) -> Vec<Scored> {
        let mut scored: Vec<Scored> = self
            .scores(query)
            .into_iter()
            .enumerate()
            .map(|(index, score)| Scored { index, score })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
        scored.truncate(k);
        scored
    }
}

/// Inverse document frequency per term. Terms present in more than half the
/// corpus would score negatively and are floored to `epsilon` times the mean.
fn compute_idf(doc_freqs: &HashMap<String, usize>, corpus_size: usize, epsilon: f64) -> HashMap<String, f64> {
    let n = corpus_size as f64;
    let mut idf: HashMap<String, f64> = doc_freqs
        .iter()
        .map(|(term, &df)| {
            let df = df as f64;
            (term.clone(), (n - df + 0.5).ln() - (df + 0.5).ln())
        })
        .collect();

    if idf.is_empty() {
        return idf;
    }

    let average = idf.values().sum::<f64>() / idf.len() as f64;
    let floor = epsilon * average;
    for value in idf.values_mut() {
        if *value < 0.0 {
            *value = floor;
        }
    }

    idf
}
