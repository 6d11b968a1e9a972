//! Result records of the similarity engine
//!
//! Field names are the ones the reporting / visualization layer reads, so they
//! are part of the serialized contract.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::similarity::{NetworkEdge, SimilarityMatrix, SimilarityMethod};
use crate::utils::SummaryStats;

/// Scores of one unordered pair `(i, j)`, `i < j`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseRecord {
    pub text1_index: usize,
    pub text2_index: usize,
    pub text1_label: String,
    pub text2_label: String,
    pub jaccard_similarity: f64,
    pub edit_distance_similarity: f64,
    pub word_overlap_similarity: f64,
    pub tfidf_cosine_similarity: f64,
    pub semantic_similarity: f64,
}

impl PairwiseRecord {
    /// Score of `method`
    pub fn score(&self, method: SimilarityMethod) -> f64 {
        match method {
            SimilarityMethod::Semantic => self.semantic_similarity,
            SimilarityMethod::Tfidf => self.tfidf_cosine_similarity,
            SimilarityMethod::Jaccard => self.jaccard_similarity,
            SimilarityMethod::WordOverlap => self.word_overlap_similarity,
            SimilarityMethod::EditDistance => self.edit_distance_similarity,
        }
    }
}

/// Full matrices of the two vector methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrices {
    pub tfidf_cosine: SimilarityMatrix,
    pub semantic: SimilarityMatrix,
}

/// Per-method statistics over all pairwise records
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodSummaries {
    pub jaccard_similarity: SummaryStats,
    pub edit_distance_similarity: SummaryStats,
    pub word_overlap_similarity: SummaryStats,
    pub tfidf_cosine_similarity: SummaryStats,
    pub semantic_similarity: SummaryStats,
}

impl MethodSummaries {
    /// `None` when there is no record
    pub fn from_records(records: &[PairwiseRecord]) -> Option<Self> {
        let stats = |method: SimilarityMethod| {
            let values: Vec<f64> = records.iter().map(|r| r.score(method)).collect();
            SummaryStats::from_values(&values)
        };
        Some(Self {
            jaccard_similarity: stats(SimilarityMethod::Jaccard)?,
            edit_distance_similarity: stats(SimilarityMethod::EditDistance)?,
            word_overlap_similarity: stats(SimilarityMethod::WordOverlap)?,
            tfidf_cosine_similarity: stats(SimilarityMethod::Tfidf)?,
            semantic_similarity: stats(SimilarityMethod::Semantic)?,
        })
    }

    pub fn get(&self, method: SimilarityMethod) -> &SummaryStats {
        match method {
            SimilarityMethod::Semantic => &self.semantic_similarity,
            SimilarityMethod::Tfidf => &self.tfidf_cosine_similarity,
            SimilarityMethod::Jaccard => &self.jaccard_similarity,
            SimilarityMethod::WordOverlap => &self.word_overlap_similarity,
            SimilarityMethod::EditDistance => &self.edit_distance_similarity,
        }
    }
}

/// Output of the aggregate analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub labels: Vec<String>,
    pub text_count: usize,
    pub similarities: SimilarityMatrices,
    pub pairwise_comparisons: Vec<PairwiseRecord>,
    pub average_similarities: MethodSummaries,
}

impl AggregateReport {
    /// Full matrix of a vector method; `None` for the lexical ones
    pub fn matrix(&self, method: SimilarityMethod) -> Option<&SimilarityMatrix> {
        match method {
            SimilarityMethod::Semantic => Some(&self.similarities.semantic),
            SimilarityMethod::Tfidf => Some(&self.similarities.tfidf_cosine),
            _ => None,
        }
    }

    /// Network-graph edges over the semantic matrix
    pub fn network_edges(&self, threshold: f64) -> Vec<NetworkEdge> {
        self.similarities.semantic.network_edges(threshold)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write pretty JSON to `path`
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }
}

/// One ranked pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    pub text1_index: usize,
    pub text2_index: usize,
    pub text1_label: String,
    pub text2_label: String,
    pub similarity: f64,
    pub method: SimilarityMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMember {
    pub index: usize,
    pub label: String,
    pub text: String,
}

/// Seed document first, then members in ascending index order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cluster {
    pub members: Vec<ClusterMember>,
}

impl Cluster {
    pub fn seed(&self) -> Option<&ClusterMember> {
        self.members.first()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.members.iter().map(|m| m.index).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// 表示用のフォーマット (小数点以下3桁)
impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "documents: {}", self.text_count)?;
        for (i, label) in self.labels.iter().enumerate() {
            writeln!(f, "  [{}] {}", i, label)?;
        }
        writeln!(f)?;
        writeln!(f, "pairwise comparisons:")?;
        for r in &self.pairwise_comparisons {
            writeln!(
                f,
                "  {} <-> {}  jaccard={:.3} edit={:.3} overlap={:.3} tfidf={:.3} semantic={:.3}",
                r.text1_label,
                r.text2_label,
                r.jaccard_similarity,
                r.edit_distance_similarity,
                r.word_overlap_similarity,
                r.tfidf_cosine_similarity,
                r.semantic_similarity,
            )?;
        }
        writeln!(f)?;
        writeln!(f, "averages:")?;
        for method in SimilarityMethod::ALL {
            let s = self.average_similarities.get(method);
            writeln!(
                f,
                "  {:<13} mean={:.3} std={:.3} min={:.3} max={:.3}",
                method.as_str(),
                s.mean,
                s.std,
                s.min,
                s.max
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for PairResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <-> {}  {}={:.3}",
            self.text1_label, self.text2_label, self.method, self.similarity
        )
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.members.iter().map(|m| m.label.as_str()).collect();
        write!(f, "{{{}}}", labels.join(", "))
    }
}
