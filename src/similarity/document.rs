use serde::{Deserialize, Serialize};

use crate::error::{Result, SimilarityError};

/// Text plus its display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub label: String,
}

/// Ordered documents; the position is the document index
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

/// Positional label, 1-indexed
pub fn default_label(index: usize) -> String {
    format!("Text{}", index + 1)
}

impl DocumentSet {
    /// Pair texts with labels
    ///
    /// # Arguments
    /// * `texts` - document texts in order
    /// * `labels` - one label per text, `Text{i+1}` when `None`
    ///
    /// # Returns
    /// * `Result<DocumentSet>` - `LabelCountMismatch` when the lengths differ
    pub fn new<S, L>(texts: &[S], labels: Option<&[L]>) -> Result<Self>
    where
        S: AsRef<str>,
        L: AsRef<str>,
    {
        if let Some(labels) = labels {
            if labels.len() != texts.len() {
                return Err(SimilarityError::LabelCountMismatch {
                    labels: labels.len(),
                    documents: texts.len(),
                });
            }
        }

        let documents = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Document {
                text: text.as_ref().to_string(),
                label: labels
                    .map(|labels| labels[i].as_ref().to_string())
                    .unwrap_or_else(|| default_label(i)),
            })
            .collect();
        Ok(Self { documents })
    }

    /// Documents with positional labels
    pub fn from_texts<S>(texts: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        Self {
            documents: texts
                .iter()
                .enumerate()
                .map(|(i, text)| Document {
                    text: text.as_ref().to_string(),
                    label: default_label(i),
                })
                .collect(),
        }
    }

    /// Fail with `InsufficientDocuments` when fewer than `required` documents
    pub fn require(&self, operation: &'static str, required: usize) -> Result<()> {
        if self.documents.len() < required {
            return Err(SimilarityError::InsufficientDocuments {
                operation,
                required,
                actual: self.documents.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.text.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.label.clone()).collect()
    }

    /// Unordered pairs `(i, j)`, `i < j`, `i` ascending in the outer loop
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.documents.len();
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
    }

    /// `n * (n - 1) / 2`
    pub fn pair_count(&self) -> usize {
        let n = self.documents.len();
        n * n.saturating_sub(1) / 2
    }
}

impl std::ops::Index<usize> for DocumentSet {
    type Output = Document;

    fn index(&self, index: usize) -> &Self::Output {
        &self.documents[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labels_are_one_indexed() {
        let set = DocumentSet::from_texts(&["甲", "乙"]);
        assert_eq!(set.labels(), vec!["Text1", "Text2"]);
        let same = DocumentSet::new::<_, &str>(&["甲", "乙"], None).unwrap();
        assert_eq!(set, same);
    }

    #[test]
    fn explicit_labels_need_not_be_unique() {
        let set = DocumentSet::new(&["a", "b"], Some(&["x", "x"][..])).unwrap();
        assert_eq!(set[1].label, "x");
        assert_eq!(set.texts(), vec!["a", "b"]);
    }

    #[test]
    fn label_count_mismatch() {
        let err = DocumentSet::new(&["a", "b", "c"], Some(&["x"][..])).unwrap_err();
        assert!(matches!(
            err,
            SimilarityError::LabelCountMismatch {
                labels: 1,
                documents: 3
            }
        ));
    }

    #[test]
    fn pair_enumeration_order() {
        let set = DocumentSet::from_texts(&["a", "b", "c", "d"]);
        let pairs: Vec<_> = set.pairs().collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(set.pair_count(), 6);
        assert_eq!(DocumentSet::from_texts::<&str>(&[]).pair_count(), 0);
    }

    #[test]
    fn require_counts() {
        let set = DocumentSet::from_texts(&["only"]);
        assert!(set.require("clustering", 1).is_ok());
        let err = set.require("aggregate analysis", 2).unwrap_err();
        assert!(err.is_precondition());
    }
}
