//! Error types for the similarity engine
//!
//! Only precondition violations and I/O style failures surface as
//! `SimilarityError`. Vocabulary and embedding failures have their own narrow
//! types so that callers can absorb exactly those and nothing else.

use std::path::PathBuf;

use thiserror::Error;

use crate::similarity::SimilarityMethod;

/// Errors returned by the public API
#[derive(Error, Debug)]
pub enum SimilarityError {
    #[error("{operation} requires at least {required} document(s), got {actual}")]
    InsufficientDocuments {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("label count ({labels}) does not match document count ({documents})")]
    LabelCountMismatch { labels: usize, documents: usize },

    #[error("method `{0}` is not supported for clustering (expected: semantic or tfidf)")]
    UnsupportedClusterMethod(SimilarityMethod),

    #[error("unknown similarity method: {0} (expected: semantic, tfidf, jaccard, word_overlap or edit_distance)")]
    UnknownMethod(String),

    #[error("invalid similarity matrix: {0}")]
    InvalidMatrix(String),

    #[error("failed to load dictionary {path:?}: {reason}")]
    Dictionary { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CBOR error: {0}")]
    Cbor(#[from] serde_cbor::Error),

    #[error("{0}")]
    Other(String),
}

impl SimilarityError {
    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            SimilarityError::InsufficientDocuments { .. } => "insufficient_documents",
            SimilarityError::LabelCountMismatch { .. } => "label_count_mismatch",
            SimilarityError::UnsupportedClusterMethod(_) => "unsupported_cluster_method",
            SimilarityError::UnknownMethod(_) => "unknown_method",
            SimilarityError::InvalidMatrix(_) => "invalid_matrix",
            SimilarityError::Dictionary { .. } => "dictionary_error",
            SimilarityError::Io(_) => "io_error",
            SimilarityError::Json(_) => "json_error",
            SimilarityError::Toml(_) => "toml_error",
            SimilarityError::Cbor(_) => "cbor_error",
            SimilarityError::Other(_) => "other",
        }
    }

    /// Whether this error is a caller-side precondition violation
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SimilarityError::InsufficientDocuments { .. }
                | SimilarityError::LabelCountMismatch { .. }
                | SimilarityError::UnsupportedClusterMethod(_)
                | SimilarityError::UnknownMethod(_)
        )
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for similarity operations
pub type Result<T> = std::result::Result<T, SimilarityError>;

/// Vectorizer failure
/// The only failure class absorbed by TF-IDF similarity (it yields a zero matrix).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectorizeError {
    #[error("empty vocabulary: none of the {documents} document(s) produced a token")]
    EmptyVocabulary { documents: usize },
}

/// Embedding backend failure
/// Absorbed at the semantic similarity boundary (falls back to TF-IDF).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingError {
    #[error("failed to load embedding model `{model}`: {reason}")]
    ModelLoad { model: String, reason: String },

    #[error("embedding backend unavailable: {0}")]
    Unavailable(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("backend returned {actual} embedding row(s) for {expected} input(s)")]
    RowCountMismatch { expected: usize, actual: usize },
}
