use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::tokenizer::TokenFrequency;

/// keep document count and document frequency of each token
/// 語彙の次元 index は token の初出順になります
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    /// number of documents added
    doc_num: u64,
    /// token -> number of documents containing it
    #[serde(with = "indexmap::map::serde_seq")]
    token_doc_counts: IndexMap<Box<str>, u64>,
}

impl Corpus {
    /// Create a new instance
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            token_doc_counts: IndexMap::new(),
        }
    }

    /// Build a corpus from the token frequencies of each document, in order
    pub fn from_documents(docs: &[TokenFrequency]) -> Self {
        let mut corpus = Self::new();
        for doc in docs {
            corpus.add_set(&doc.token_set_ref_str());
        }
        corpus
    }

    /// Add a document's distinct tokens to the corpus
    /// 重複した token を渡すと df が過大になるので、呼び出し側で set にしておくこと
    pub fn add_set<T>(&mut self, tokens: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        for token in tokens {
            *self
                .token_doc_counts
                .entry(token.as_ref().into())
                .or_insert(0) += 1;
        }
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the document frequency of a token
    #[inline]
    pub fn get_token_count(&self, token: &str) -> u64 {
        self.token_doc_counts.get(token).copied().unwrap_or(0)
    }

    /// Dimension index of a token
    #[inline]
    pub fn token_index(&self, token: &str) -> Option<usize> {
        self.token_doc_counts.get_index_of(token)
    }

    /// Get the current vocabulary size (number of unique tokens)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.token_doc_counts.len()
    }

    /// (token, document frequency) in dimension order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.token_doc_counts
            .iter()
            .map(|(token, &count)| (token.as_ref(), count))
    }
}
