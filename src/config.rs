//! Analyzer configuration
//!
//! Stored as TOML. Every field is optional in the file and falls back to the
//! defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimilarityError};
use crate::similarity::SimilarityMethod;

/// Default sentence-embedding model
pub const DEFAULT_MODEL_NAME: &str = "paraphrase-multilingual-MiniLM-L12-v2";

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Prefer an accelerated device for the embedding model
    #[serde(default)]
    pub use_gpu: bool,

    /// Embedding model identifier
    #[serde(default = "default_model_name")]
    pub model_name: String,

    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Segmentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// HMM discovery of out-of-dictionary words
    #[serde(default = "default_hmm")]
    pub hmm: bool,

    /// jieba user dictionary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_dict: Option<PathBuf>,

    /// Stop-word list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopwords: Option<PathBuf>,

    /// Drop stop words from segmentation output
    #[serde(default)]
    pub filter_stopwords: bool,
}

/// Defaults used by the CLI when a flag is not given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub method: SimilarityMethod,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default = "default_cluster_threshold")]
    pub cluster_threshold: f64,

    /// Edge threshold for network rendering data
    #[serde(default = "default_network_threshold")]
    pub network_threshold: f64,
}

impl AnalyzerConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AnalyzerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SimilarityError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}

fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.to_string()
}

fn default_hmm() -> bool {
    true
}

fn default_top_k() -> usize {
    5
}

fn default_cluster_threshold() -> f64 {
    0.7
}

fn default_network_threshold() -> f64 {
    0.5
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            use_gpu: false,
            model_name: default_model_name(),
            tokenizer: TokenizerConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig {
            hmm: default_hmm(),
            user_dict: None,
            stopwords: None,
            filter_stopwords: false,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            method: SimilarityMethod::default(),
            top_k: default_top_k(),
            cluster_threshold: default_cluster_threshold(),
            network_threshold: default_network_threshold(),
        }
    }
}
