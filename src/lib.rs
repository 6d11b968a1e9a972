/// This crate is a multi-method similarity engine for Chinese documents.
pub mod config;
pub mod error;
pub mod logging;
pub mod similarity;
pub mod tokenizer;
pub mod utils;
pub mod vectorizer;

/// Text Similarity Analyzer
/// The top-level struct of this crate. It scores document pairs with five
/// independent methods and derives rankings and clusters from the results.
///
/// Methods:
/// - `jaccard`: token-set Jaccard
/// - `edit_distance`: normalized Levenshtein distance over characters
/// - `word_overlap`: Dice coefficient over token multisets
/// - `tfidf`: TF-IDF cosine, refit on every call
/// - `semantic`: sentence-embedding cosine
///
/// The embedding model is loaded once, at construction. If it cannot be
/// loaded (no backend compiled in, missing weights, ...) the analyzer stays
/// usable and `semantic` returns the TF-IDF scores instead. An encode failure
/// at call time falls back the same way.
///
/// A TF-IDF fit over documents without a single token yields an all-zero
/// matrix rather than an error.
///
/// Only precondition violations are returned as errors:
/// - too few documents (2 for aggregate analysis and ranking, 1 otherwise)
/// - label count different from document count
/// - clustering with a lexical method
///
/// # Thread Safety
/// The analyzer is `Send + Sync`; pair scoring runs on the rayon pool.
pub use similarity::TextSimilarityAnalyzer;

/// Aggregate analysis result
/// Labels, document count, the TF-IDF and semantic matrices, one
/// `PairwiseRecord` per unordered pair in `(i, j)` order, and
/// mean / std / min / max of every method over all pairs.
///
/// # Serialization
/// JSON (field names are stable) and CBOR.
pub use similarity::AggregateReport;

/// Similarity method selector
/// Closed set: `semantic`, `tfidf`, `jaccard`, `word_overlap`, `edit_distance`.
/// Parses from and displays as these names.
pub use similarity::SimilarityMethod;

/// n×n symmetric similarity matrix, serialized as nested arrays
pub use similarity::SimilarityMatrix;

pub use similarity::{Cluster, ClusterMember, Document, DocumentSet, PairResult, PairwiseRecord};

/// Embedding model contract
/// Implement `EmbeddingBackend` and `ModelLoader` to plug in a sentence
/// embedding model. With the `fastembed` feature a CPU backend is provided.
pub use similarity::{Device, EmbeddingBackend, ModelLoader, SemanticModel};

#[cfg(feature = "fastembed")]
pub use similarity::fastembed::FastEmbedLoader;

/// Tokenizer
/// Anything producing an ordered token sequence per text can drive the
/// analyzer. `JiebaTokenizer` is the default, with optional user dictionary
/// and stop-word list.
pub use tokenizer::{JiebaTokenizer, Tokenizer};

/// Token Frequency structure
/// A struct for analyzing/managing token occurrence frequency within a document.
/// It manages:
/// - The count of occurrences of each token
/// - The total number of tokens in the document
///
/// Multiset intersection (`overlap`) backs the word-overlap method.
pub use tokenizer::TokenFrequency;

/// Corpus for the TF-IDF vectorizer
/// Document count and per-token document frequency. Token dimension indices
/// follow first-seen order.
pub use vectorizer::corpus::Corpus;

/// TF-IDF Vectorizer
/// Fits a vocabulary on a document set and returns L2-normalized sparse rows.
///
/// `TfIdfVectorizer<E>` has the following generic parameter:
/// - `E`: TF-IDF calculation engine type (e.g., `DefaultTfIdfEngine`)
pub use vectorizer::{TfIdfMatrix, TfIdfVectorizer};

/// TF-IDF Engine
/// `DefaultTfIdfEngine`: raw count tf, smoothed idf `ln((1 + n) / (1 + df)) + 1`.
pub use vectorizer::tfidf::{DefaultTfIdfEngine, TfIdfEngine};

pub use config::AnalyzerConfig;
pub use error::{EmbeddingError, Result, SimilarityError, VectorizeError};
