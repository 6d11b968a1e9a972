pub mod compare;
pub mod corpus;
pub mod tfidf;

use std::marker::PhantomData;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::VectorizeError;
use crate::similarity::SimilarityMatrix;
use crate::tokenizer::{TokenFrequency, Tokenizer};
use crate::utils::SparseVec;
use crate::vectorizer::compare::{Compare, DefaultCompare};
use crate::vectorizer::corpus::Corpus;
use crate::vectorizer::tfidf::{DefaultTfIdfEngine, TfIdfEngine};

/// TF-IDF vectorizer
/// 呼び出しごとに fit し直すので、語彙は常に入力ドキュメント集合と一致します
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfVectorizer<E = DefaultTfIdfEngine>
where
    E: TfIdfEngine,
{
    _marker: PhantomData<E>,
}

/// fit_transform の結果
/// 行はドキュメント順、列は corpus の語彙順
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfMatrix {
    pub corpus: Corpus,
    pub idf: Vec<f64>,
    pub rows: Vec<SparseVec<f64>>,
}

impl<E> TfIdfVectorizer<E>
where
    E: TfIdfEngine,
{
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// ドキュメント集合に fit し、TF-IDF 行列を返します
    ///
    /// # Arguments
    /// * `documents` - 入力テキスト (順序がそのまま行順になります)
    /// * `tokenizer` - 分かち書きに使う tokenizer
    ///
    /// # Returns
    /// * `Result<TfIdfMatrix, VectorizeError>` - どのドキュメントも token を持たない場合は `EmptyVocabulary`
    pub fn fit_transform<S>(
        &self,
        documents: &[S],
        tokenizer: &dyn Tokenizer,
    ) -> Result<TfIdfMatrix, VectorizeError>
    where
        S: AsRef<str> + Sync,
    {
        // 分かち書きは並列、語彙順はドキュメント順
        let freqs: Vec<TokenFrequency> = documents
            .par_iter()
            .map(|doc| tokenizer.token_frequency(doc.as_ref()))
            .collect();

        let corpus = Corpus::from_documents(&freqs);
        if corpus.vocab_size() == 0 {
            return Err(VectorizeError::EmptyVocabulary {
                documents: documents.len(),
            });
        }

        let idf = E::idf_vec(&corpus);
        let rows = freqs
            .par_iter()
            .map(|freq| E::tfidf_vec(freq, &corpus, &idf))
            .collect();

        tracing::debug!(
            documents = documents.len(),
            vocab_size = corpus.vocab_size(),
            "fitted tf-idf vectorizer"
        );

        Ok(TfIdfMatrix { corpus, idf, rows })
    }
}

impl TfIdfMatrix {
    /// ドキュメント数
    #[inline]
    pub fn doc_num(&self) -> usize {
        self.rows.len()
    }

    /// 語彙数 (列数)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.corpus.vocab_size()
    }

    /// 行 i, j のコサイン類似度
    #[inline]
    pub fn cosine(&self, i: usize, j: usize) -> f64 {
        match (self.rows.get(i), self.rows.get(j)) {
            (Some(a), Some(b)) => <DefaultCompare as Compare<f64>>::sparse_cosine_similarity(
                a.raw_iter(),
                b.raw_iter(),
            ),
            _ => 0.0,
        }
    }

    /// 全行ペアのコサイン類似度行列 (対角を含む)
    pub fn cosine_matrix(&self) -> SimilarityMatrix {
        SimilarityMatrix::from_symmetric_fn(self.doc_num(), |i, j| self.cosine(i, j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CharTokenizer;

    struct WhitespaceTokenizer;

    impl Tokenizer for WhitespaceTokenizer {
        fn segment(&self, text: &str) -> Vec<String> {
            text.split_whitespace().map(str::to_string).collect()
        }
    }

    #[test]
    fn fit_transform_shape_and_diagonal() {
        let docs = ["天氣 很好 適合", "天氣 晴朗 適合", "下雨 路上 很濕"];
        let matrix = TfIdfVectorizer::<DefaultTfIdfEngine>::new()
            .fit_transform(&docs, &WhitespaceTokenizer)
            .unwrap();
        assert_eq!(matrix.doc_num(), 3);
        assert_eq!(matrix.vocab_size(), 7);

        let sims = matrix.cosine_matrix();
        for i in 0..3 {
            assert!((sims.get(i, i) - 1.0).abs() < 1e-6);
        }
        assert!(sims.get(0, 1) > sims.get(0, 2));
        assert_eq!(sims.get(0, 2), 0.0);
        assert_eq!(sims.get(0, 1), sims.get(1, 0));
    }

    #[test]
    fn empty_vocabulary_is_an_error() {
        let docs = ["", "   "];
        let err = TfIdfVectorizer::<DefaultTfIdfEngine>::new()
            .fit_transform(&docs, &CharTokenizer)
            .unwrap_err();
        assert_eq!(err, VectorizeError::EmptyVocabulary { documents: 2 });
    }

    #[test]
    fn empty_document_row_is_zero() {
        let docs = vec!["好天氣".to_string(), String::new()];
        let matrix = TfIdfVectorizer::<DefaultTfIdfEngine>::new()
            .fit_transform(&docs, &CharTokenizer)
            .unwrap();
        assert_eq!(matrix.rows[1].nnz(), 0);
        let sims = matrix.cosine_matrix();
        assert_eq!(sims.get(1, 1), 0.0);
        assert_eq!(sims.get(0, 1), 0.0);
    }

    #[test]
    fn refit_per_call() {
        let vectorizer = TfIdfVectorizer::<DefaultTfIdfEngine>::new();
        let first = vectorizer.fit_transform(&["甲 乙"], &WhitespaceTokenizer).unwrap();
        let second = vectorizer.fit_transform(&["丙"], &WhitespaceTokenizer).unwrap();
        assert_eq!(first.vocab_size(), 2);
        assert_eq!(second.vocab_size(), 1);
    }
}
