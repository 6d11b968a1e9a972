//! Similarity engine
//!
//! - [`lexical`]: Jaccard, edit distance and word overlap on a text pair
//! - [`semantic`]: embedding backend contract and the one-shot model cell
//! - [`analyzer`]: [`TextSimilarityAnalyzer`], the aggregate entry point
//! - [`ranking`]: top-K pairs and seed-scan clustering over a matrix

pub mod analyzer;
pub mod document;
#[cfg(feature = "fastembed")]
pub mod fastembed;
pub mod lexical;
pub mod matrix;
pub mod ranking;
pub mod report;
pub mod semantic;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimilarityError;

pub use analyzer::TextSimilarityAnalyzer;
pub use document::{Document, DocumentSet};
pub use matrix::{NetworkEdge, SimilarityMatrix};
pub use report::{AggregateReport, Cluster, ClusterMember, PairResult, PairwiseRecord};
pub use semantic::{Device, EmbeddingBackend, ModelLoader, NoBackendLoader, SemanticModel};

/// Selectable similarity method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    /// sentence-embedding cosine (TF-IDF when no model is loaded)
    #[default]
    Semantic,
    Tfidf,
    Jaccard,
    WordOverlap,
    EditDistance,
}

impl SimilarityMethod {
    pub const ALL: [SimilarityMethod; 5] = [
        SimilarityMethod::Semantic,
        SimilarityMethod::Tfidf,
        SimilarityMethod::Jaccard,
        SimilarityMethod::WordOverlap,
        SimilarityMethod::EditDistance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMethod::Semantic => "semantic",
            SimilarityMethod::Tfidf => "tfidf",
            SimilarityMethod::Jaccard => "jaccard",
            SimilarityMethod::WordOverlap => "word_overlap",
            SimilarityMethod::EditDistance => "edit_distance",
        }
    }

    /// Only matrix methods can drive clustering
    pub fn supports_clustering(&self) -> bool {
        matches!(self, SimilarityMethod::Semantic | SimilarityMethod::Tfidf)
    }
}

impl fmt::Display for SimilarityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityMethod {
    type Err = SimilarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SimilarityMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| SimilarityError::UnknownMethod(s.to_string()))
    }
}
