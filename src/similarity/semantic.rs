//! Sentence-embedding similarity
//!
//! The model is loaded at most once per [`SemanticModel`]. A failed load is
//! memoized as [`ModelState::Unavailable`] and never retried; callers then get
//! TF-IDF scores instead (see `TextSimilarityAnalyzer::semantic_cosine`).

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::EmbeddingError;
use crate::similarity::SimilarityMatrix;
use crate::vectorizer::compare::{Compare, DefaultCompare};

/// Embedding provider
/// One `encode` call per batch, one row per input, rows comparable by cosine.
pub trait EmbeddingBackend: Send + Sync {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Loads embedding backends and reports accelerator capabilities
pub trait ModelLoader {
    /// Whether an accelerated runtime is compiled in / installed
    fn accelerator_runtime_available(&self) -> bool;

    /// Number of compatible accelerated devices
    fn accelerator_device_count(&self) -> usize;

    fn load(
        &self,
        model_name: &str,
        device: Device,
    ) -> Result<Box<dyn EmbeddingBackend>, EmbeddingError>;
}

/// Device the model runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    #[default]
    Cpu,
    Cuda(usize),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => f.write_str("cpu"),
            Device::Cuda(ordinal) => write!(f, "cuda:{}", ordinal),
        }
    }
}

/// Accelerated device only when it is preferred, the runtime is there and at
/// least one device is present. CPU otherwise.
pub fn select_device(prefer_accelerated: bool, loader: &dyn ModelLoader) -> Device {
    if prefer_accelerated
        && loader.accelerator_runtime_available()
        && loader.accelerator_device_count() > 0
    {
        Device::Cuda(0)
    } else {
        Device::Cpu
    }
}

/// Loader used when no embedding backend is compiled in
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackendLoader;

impl ModelLoader for NoBackendLoader {
    fn accelerator_runtime_available(&self) -> bool {
        false
    }

    fn accelerator_device_count(&self) -> usize {
        0
    }

    fn load(
        &self,
        model_name: &str,
        _device: Device,
    ) -> Result<Box<dyn EmbeddingBackend>, EmbeddingError> {
        Err(EmbeddingError::Unavailable(format!(
            "no embedding backend compiled in for `{}` (enable the `fastembed` feature)",
            model_name
        )))
    }
}

/// Result of the one-shot model load
pub enum ModelState {
    Loaded {
        backend: Box<dyn EmbeddingBackend>,
        device: Device,
        model_name: String,
    },
    Unavailable {
        reason: String,
    },
}

impl fmt::Debug for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelState::Loaded {
                device, model_name, ..
            } => f
                .debug_struct("Loaded")
                .field("device", device)
                .field("model_name", model_name)
                .finish_non_exhaustive(),
            ModelState::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Lazily initialized embedding model
#[derive(Debug, Default)]
pub struct SemanticModel {
    state: OnceLock<ModelState>,
}

impl SemanticModel {
    /// Empty cell; nothing is loaded until [`SemanticModel::initialize`]
    pub fn new() -> Self {
        Self {
            state: OnceLock::new(),
        }
    }

    /// Load the model on first call. Later calls return the memoized state,
    /// including a failure.
    pub fn initialize(
        &self,
        model_name: &str,
        prefer_accelerated: bool,
        loader: &dyn ModelLoader,
    ) -> &ModelState {
        self.state.get_or_init(|| {
            let device = select_device(prefer_accelerated, loader);
            match loader.load(model_name, device) {
                Ok(backend) => {
                    tracing::info!(model = model_name, %device, "loaded embedding model");
                    ModelState::Loaded {
                        backend,
                        device,
                        model_name: model_name.to_string(),
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        model = model_name,
                        %device,
                        error = %e,
                        "embedding model unavailable, semantic similarity falls back to tf-idf"
                    );
                    ModelState::Unavailable {
                        reason: e.to_string(),
                    }
                }
            }
        })
    }

    /// `None` until initialized
    pub fn state(&self) -> Option<&ModelState> {
        self.state.get()
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state.get(), Some(ModelState::Loaded { .. }))
    }

    pub fn device(&self) -> Option<Device> {
        match self.state.get() {
            Some(ModelState::Loaded { device, .. }) => Some(*device),
            _ => None,
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        match self.state.get() {
            Some(ModelState::Loaded { model_name, .. }) => Some(model_name),
            _ => None,
        }
    }

    /// Encode the whole batch in one backend call
    pub fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let backend = match self.state.get() {
            Some(ModelState::Loaded { backend, .. }) => backend,
            Some(ModelState::Unavailable { reason }) => {
                return Err(EmbeddingError::Unavailable(reason.clone()))
            }
            None => {
                return Err(EmbeddingError::Unavailable(
                    "model not initialized".to_string(),
                ))
            }
        };

        let embeddings = backend.encode(texts)?;
        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::RowCountMismatch {
                expected: texts.len(),
                actual: embeddings.len(),
            });
        }
        check_rows(&embeddings)?;
        Ok(embeddings)
    }

    /// Cosine matrix of the batch embeddings
    pub fn cosine_matrix(&self, texts: &[&str]) -> Result<SimilarityMatrix, EmbeddingError> {
        let embeddings = self.encode(texts)?;
        Ok(embedding_cosine_matrix(&embeddings))
    }
}

/// 全行が同じ次元で、有限の値のみ
fn check_rows(embeddings: &[Vec<f32>]) -> Result<(), EmbeddingError> {
    let Some(dim) = embeddings.first().map(Vec::len) else {
        return Ok(());
    };
    for (row, embedding) in embeddings.iter().enumerate() {
        if embedding.len() != dim {
            return Err(EmbeddingError::Encode(format!(
                "row {} has dimension {}, expected {}",
                row,
                embedding.len(),
                dim
            )));
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::Encode(format!(
                "row {} contains a non-finite value",
                row
            )));
        }
    }
    Ok(())
}

/// Pairwise cosine over dense embedding rows
pub fn embedding_cosine_matrix(embeddings: &[Vec<f32>]) -> SimilarityMatrix {
    SimilarityMatrix::from_symmetric_fn(embeddings.len(), |i, j| {
        <DefaultCompare as Compare<f32>>::cosine_similarity(
            embeddings[i].iter().copied(),
            embeddings[j].iter().copied(),
        )
    })
}
