//! Tokenizer adapter
//!
//! The similarity engine only needs an ordered token sequence per text. Any
//! segmentation engine can be plugged in through [`Tokenizer`]; the default is
//! [`JiebaTokenizer`].

pub mod jieba;
pub mod token;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub use jieba::JiebaTokenizer;
pub use token::TokenFrequency;

/// Segmentation contract
/// Deterministic for a fixed dictionary configuration, no side effects.
pub trait Tokenizer: Send + Sync {
    /// Ordered token sequence (empty for empty input)
    fn segment(&self, text: &str) -> Vec<String>;

    /// Distinct tokens of `text`
    fn token_set(&self, text: &str) -> HashSet<String> {
        self.segment(text).into_iter().collect()
    }

    /// Token multiset of `text`, in first-seen order
    fn token_frequency(&self, text: &str) -> TokenFrequency {
        self.segment(text).into_iter().collect()
    }
}

impl<T> Tokenizer for &T
where
    T: Tokenizer + ?Sized,
{
    fn segment(&self, text: &str) -> Vec<String> {
        (**self).segment(text)
    }
}

impl<T> Tokenizer for Box<T>
where
    T: Tokenizer + ?Sized,
{
    fn segment(&self, text: &str) -> Vec<String> {
        (**self).segment(text)
    }
}

/// Splits on every `char`, skipping whitespace
/// Dictionary free; useful as a baseline and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    fn segment(&self, text: &str) -> Vec<String> {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_string())
            .collect()
    }
}

/// Read a word-list file: one entry per line, blank lines and `#` comments skipped
pub(crate) fn read_word_list(path: &Path) -> std::io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
