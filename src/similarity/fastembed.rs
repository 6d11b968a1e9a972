//! fastembed (ONNX runtime) embedding backend

use std::sync::Mutex;

use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::error::EmbeddingError;
use crate::similarity::semantic::{Device, EmbeddingBackend, ModelLoader};

/// Map a model identifier to a fastembed model
fn resolve_model(model_name: &str) -> Option<EmbeddingModel> {
    let name = model_name.rsplit('/').next().unwrap_or(model_name);
    match name.to_ascii_lowercase().as_str() {
        "paraphrase-multilingual-minilm-l12-v2" => Some(EmbeddingModel::ParaphraseMLMiniLML12V2),
        "all-minilm-l6-v2" => Some(EmbeddingModel::AllMiniLML6V2),
        "multilingual-e5-small" => Some(EmbeddingModel::MultilingualE5Small),
        "bge-small-zh-v1.5" => Some(EmbeddingModel::BGESmallZHV15),
        _ => None,
    }
}

/// Loads models through fastembed
/// CPU execution only, so no accelerated device is ever reported.
#[derive(Debug, Clone, Default)]
pub struct FastEmbedLoader {
    pub show_download_progress: bool,
}

impl ModelLoader for FastEmbedLoader {
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
        let model = resolve_model(model_name).ok_or_else(|| EmbeddingError::ModelLoad {
            model: model_name.to_string(),
            reason: "unsupported model".to_string(),
        })?;
        let options =
            InitOptions::new(model).with_show_download_progress(self.show_download_progress);
        let embedding = TextEmbedding::try_new(options).map_err(|e| EmbeddingError::ModelLoad {
            model: model_name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Box::new(FastEmbedBackend {
            model: Mutex::new(embedding),
        }))
    }
}

pub struct FastEmbedBackend {
    model: Mutex<TextEmbedding>,
}

impl EmbeddingBackend for FastEmbedBackend {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| EmbeddingError::Encode("embedding model lock poisoned".to_string()))?;
        model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::Encode(e.to_string()))
    }
}
