use crate::{tokenizer::TokenFrequency, utils::SparseVec, vectorizer::corpus::Corpus};

pub trait TfIdfEngine {
    /// IDFベクトルを生成するメソッド
    /// # Arguments
    /// * `corpus` - コーパス
    /// # Returns
    /// * `Vec<f64>` - 語彙の次元順のIDFベクトル
    fn idf_vec(corpus: &Corpus) -> Vec<f64>;

    /// TFベクトルを生成するメソッド
    /// # Arguments
    /// * `freq` - ドキュメントのtoken頻度
    /// * `corpus` - 次元を決めるコーパス
    /// # Returns
    /// * `SparseVec<f64>` - 語彙の次元順のTFベクトル
    fn tf_vec(freq: &TokenFrequency, corpus: &Corpus) -> SparseVec<f64>;

    /// 正規化済みTF-IDFベクトル
    fn tfidf_vec(freq: &TokenFrequency, corpus: &Corpus, idf: &[f64]) -> SparseVec<f64> {
        let tf = Self::tf_vec(freq, corpus);
        let mut vec = SparseVec::from_pairs(
            tf.len(),
            tf.raw_iter()
                .map(|(idx, tf)| (idx, tf * idf.get(idx).copied().unwrap_or(0.0))),
        );
        vec.normalize();
        vec
    }
}

/// デフォルトのTF-IDFエンジン
/// tf = 出現回数, idf = ln((1 + n) / (1 + df)) + 1 (smooth idf)
/// 行ベクトルは L2 正規化されます
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTfIdfEngine;

impl TfIdfEngine for DefaultTfIdfEngine {
    fn idf_vec(corpus: &Corpus) -> Vec<f64> {
        let doc_num = corpus.get_doc_num() as f64;
        corpus
            .iter()
            .map(|(_, doc_freq)| ((1.0 + doc_num) / (1.0 + doc_freq as f64)).ln() + 1.0)
            .collect()
    }

    fn tf_vec(freq: &TokenFrequency, corpus: &Corpus) -> SparseVec<f64> {
        SparseVec::from_pairs(
            corpus.vocab_size(),
            freq.iter()
                .filter_map(|(token, count)| corpus.token_index(token).map(|idx| (idx, count as f64))),
        )
    }
}
