use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use jieba_rs::Jieba;

use crate::config::TokenizerConfig;
use crate::error::{Result, SimilarityError};
use crate::tokenizer::{read_word_list, Tokenizer};

/// jieba segmentation with an optional user dictionary and stop-word list
///
/// Each instance owns its dictionary, so user words loaded into one tokenizer
/// never leak into another.
pub struct JiebaTokenizer {
    jieba: Jieba,
    hmm: bool,
    stopwords: HashSet<String>,
    filter_stopwords: bool,
}

impl std::fmt::Debug for JiebaTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiebaTokenizer")
            .field("hmm", &self.hmm)
            .field("stopwords", &self.stopwords.len())
            .field("filter_stopwords", &self.filter_stopwords)
            .finish()
    }
}

impl Default for JiebaTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl JiebaTokenizer {
    /// Default dictionary, HMM enabled, no stop-word filtering
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
            hmm: true,
            stopwords: HashSet::new(),
            filter_stopwords: false,
        }
    }

    /// Build from configuration, loading the user dictionary and stop words if set
    pub fn from_config(config: &TokenizerConfig) -> Result<Self> {
        let mut tokenizer = Self::new().with_hmm(config.hmm);
        if let Some(path) = &config.user_dict {
            tokenizer.load_user_dict(path)?;
        }
        if let Some(path) = &config.stopwords {
            tokenizer.load_stopwords(path)?;
        }
        tokenizer.filter_stopwords = config.filter_stopwords;
        Ok(tokenizer)
    }

    pub fn with_hmm(mut self, hmm: bool) -> Self {
        self.hmm = hmm;
        self
    }

    pub fn with_stopword_filter(mut self, enabled: bool) -> Self {
        self.filter_stopwords = enabled;
        self
    }

    /// Load a jieba user dictionary (`word [freq] [tag]` per line)
    ///
    /// # Returns
    /// * `usize` - number of dictionary entries loaded
    pub fn load_user_dict(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let entries = read_word_list(path)?;
        // jieba rejects comment lines, feed it the cleaned list
        let mut reader = Cursor::new(entries.join("\n"));
        self.jieba
            .load_dict(&mut reader)
            .map_err(|e| SimilarityError::Dictionary {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        tracing::info!(path = %path.display(), words = entries.len(), "loaded user dictionary");
        Ok(entries.len())
    }

    /// Add a single word to the dictionary
    pub fn add_word(&mut self, word: &str, freq: Option<usize>, tag: Option<&str>) {
        self.jieba.add_word(word, freq, tag);
    }

    /// Load stop words, one per line
    ///
    /// # Returns
    /// * `usize` - size of the stop-word set after loading
    pub fn load_stopwords(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let words = read_word_list(path)?;
        self.stopwords.extend(words);
        tracing::info!(path = %path.display(), words = self.stopwords.len(), "loaded stop words");
        Ok(self.stopwords.len())
    }

    pub fn stopwords(&self) -> &HashSet<String> {
        &self.stopwords
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// (word, part-of-speech) pairs
    pub fn tag(&self, text: &str) -> Vec<(String, String)> {
        self.jieba
            .tag(text, self.hmm)
            .into_iter()
            .filter(|t| !(self.filter_stopwords && self.is_stopword(t.word)))
            .map(|t| (t.word.to_string(), t.tag.to_string()))
            .collect()
    }
}

impl Tokenizer for JiebaTokenizer {
    fn segment(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, self.hmm)
            .into_iter()
            .filter(|word| !(self.filter_stopwords && self.is_stopword(word)))
            .map(str::to_string)
            .collect()
    }
}
