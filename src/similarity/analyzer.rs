//! Multi-method similarity analyzer
//!
//! Failure policy:
//! - an empty TF-IDF vocabulary yields an all-zero matrix
//! - an unavailable or failing embedding model yields the TF-IDF matrix
//! - precondition violations (document or label counts, clustering method) are returned as errors

use rayon::prelude::*;

use crate::config::AnalyzerConfig;
use crate::error::{Result, SimilarityError};
use crate::similarity::document::DocumentSet;
use crate::similarity::lexical;
use crate::similarity::ranking::{greedy_seed_clusters, top_k_pairs};
use crate::similarity::report::{
    AggregateReport, Cluster, ClusterMember, MethodSummaries, PairResult, PairwiseRecord,
    SimilarityMatrices,
};
use crate::similarity::semantic::{ModelLoader, NoBackendLoader, SemanticModel};
use crate::similarity::{SimilarityMatrix, SimilarityMethod};
use crate::tokenizer::{JiebaTokenizer, Tokenizer};
use crate::vectorizer::tfidf::DefaultTfIdfEngine;
use crate::vectorizer::TfIdfVectorizer;

/// Similarity engine over a tokenizer and an optional embedding model
pub struct TextSimilarityAnalyzer {
    tokenizer: Box<dyn Tokenizer>,
    semantic: SemanticModel,
    config: AnalyzerConfig,
}

impl std::fmt::Debug for TextSimilarityAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSimilarityAnalyzer")
            .field("semantic", &self.semantic)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Loader used by [`TextSimilarityAnalyzer::new`]
pub fn default_loader() -> Box<dyn ModelLoader> {
    #[cfg(feature = "fastembed")]
    {
        Box::new(crate::similarity::fastembed::FastEmbedLoader::default())
    }
    #[cfg(not(feature = "fastembed"))]
    {
        Box::new(NoBackendLoader)
    }
}

/// 構築、状態の参照
impl TextSimilarityAnalyzer {
    /// jieba tokenizer and the compiled-in embedding backend
    /// The model load is attempted here, once.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let tokenizer = JiebaTokenizer::from_config(&config.tokenizer)?;
        let loader = default_loader();
        Ok(Self::with_loader(config, tokenizer, loader.as_ref()))
    }

    /// Custom tokenizer and model loader
    pub fn with_loader<T>(config: AnalyzerConfig, tokenizer: T, loader: &dyn ModelLoader) -> Self
    where
        T: Tokenizer + 'static,
    {
        let semantic = SemanticModel::new();
        semantic.initialize(&config.model_name, config.use_gpu, loader);
        Self {
            tokenizer: Box::new(tokenizer),
            semantic,
            config,
        }
    }

    /// No embedding model: semantic similarity is always TF-IDF
    pub fn without_semantic<T>(config: AnalyzerConfig, tokenizer: T) -> Self
    where
        T: Tokenizer + 'static,
    {
        Self::with_loader(config, tokenizer, &NoBackendLoader)
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    pub fn semantic_model(&self) -> &SemanticModel {
        &self.semantic
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

/// 個別の類似度
impl TextSimilarityAnalyzer {
    pub fn jaccard_similarity(&self, text1: &str, text2: &str) -> f64 {
        lexical::jaccard_similarity(self.tokenizer(), text1, text2)
    }

    pub fn edit_distance_similarity(&self, text1: &str, text2: &str) -> f64 {
        lexical::edit_distance_similarity(text1, text2)
    }

    pub fn word_overlap_similarity(&self, text1: &str, text2: &str) -> f64 {
        lexical::word_overlap_similarity(self.tokenizer(), text1, text2)
    }

    /// TF-IDF cosine matrix, refit on `texts`
    /// An empty vocabulary gives an all-zero matrix.
    pub fn tfidf_cosine<S>(&self, texts: &[S]) -> Result<SimilarityMatrix>
    where
        S: AsRef<str> + Sync,
    {
        require_texts("tfidf cosine similarity", texts.len(), 1)?;
        Ok(self.tfidf_matrix(texts))
    }

    /// Embedding cosine matrix, or the TF-IDF matrix when no model is usable
    pub fn semantic_cosine<S>(&self, texts: &[S]) -> Result<SimilarityMatrix>
    where
        S: AsRef<str> + Sync,
    {
        require_texts("semantic similarity", texts.len(), 1)?;
        Ok(self.semantic_matrix(texts))
    }

    /// Full matrix of a clustering-capable method
    pub fn similarity_matrix<S>(&self, texts: &[S], method: SimilarityMethod) -> Result<SimilarityMatrix>
    where
        S: AsRef<str> + Sync,
    {
        match method {
            SimilarityMethod::Semantic => self.semantic_cosine(texts),
            SimilarityMethod::Tfidf => self.tfidf_cosine(texts),
            other => Err(SimilarityError::UnsupportedClusterMethod(other)),
        }
    }

    /// Score of one pair, computed on its own
    /// Vector methods are fitted / encoded on the two texts only.
    pub fn pair_similarity(&self, text1: &str, text2: &str, method: SimilarityMethod) -> f64 {
        match method {
            SimilarityMethod::Semantic => self.semantic_matrix(&[text1, text2]).get(0, 1),
            SimilarityMethod::Tfidf => self.tfidf_matrix(&[text1, text2]).get(0, 1),
            SimilarityMethod::Jaccard => self.jaccard_similarity(text1, text2),
            SimilarityMethod::WordOverlap => self.word_overlap_similarity(text1, text2),
            SimilarityMethod::EditDistance => self.edit_distance_similarity(text1, text2),
        }
    }

    fn tfidf_matrix<S>(&self, texts: &[S]) -> SimilarityMatrix
    where
        S: AsRef<str> + Sync,
    {
        match TfIdfVectorizer::<DefaultTfIdfEngine>::new()
            .fit_transform(texts, self.tokenizer())
        {
            Ok(matrix) => matrix.cosine_matrix(),
            Err(e) => {
                tracing::warn!(error = %e, "tf-idf vectorization failed, using zero matrix");
                SimilarityMatrix::zeros(texts.len())
            }
        }
    }

    fn semantic_matrix<S>(&self, texts: &[S]) -> SimilarityMatrix
    where
        S: AsRef<str> + Sync,
    {
        if !self.semantic.is_available() {
            return self.tfidf_matrix(texts);
        }
        let refs: Vec<&str> = texts.iter().map(|t| t.as_ref()).collect();
        match self.semantic.cosine_matrix(&refs) {
            Ok(matrix) => matrix,
            Err(e) => {
                tracing::warn!(error = %e, "semantic encoding failed, falling back to tf-idf");
                self.tfidf_matrix(texts)
            }
        }
    }
}

/// 集計、ランキング、クラスタリング
impl TextSimilarityAnalyzer {
    /// All five methods on every pair plus per-method statistics
    ///
    /// # Arguments
    /// * `texts` - at least two documents
    /// * `labels` - one per text, `Text{i+1}` when `None`
    ///
    /// # Returns
    /// * `Result<AggregateReport>` - pairwise records in `(i, j)` order, `i < j`
    #[tracing::instrument(level = "debug", skip_all, fields(documents = texts.len()))]
    pub fn comprehensive_similarity_analysis<S, L>(
        &self,
        texts: &[S],
        labels: Option<&[L]>,
    ) -> Result<AggregateReport>
    where
        S: AsRef<str> + Sync,
        L: AsRef<str>,
    {
        let docs = DocumentSet::new(texts, labels)?;
        docs.require("aggregate analysis", 2)?;

        // 行列は全体で一度だけ
        let tfidf = self.tfidf_matrix(texts);
        let semantic = self.semantic_matrix(texts);

        let pairs: Vec<(usize, usize)> = docs.pairs().collect();
        let pairwise_comparisons: Vec<PairwiseRecord> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let (a, b) = (&docs[i], &docs[j]);
                PairwiseRecord {
                    text1_index: i,
                    text2_index: j,
                    text1_label: a.label.clone(),
                    text2_label: b.label.clone(),
                    jaccard_similarity: self.jaccard_similarity(&a.text, &b.text),
                    edit_distance_similarity: self.edit_distance_similarity(&a.text, &b.text),
                    word_overlap_similarity: self.word_overlap_similarity(&a.text, &b.text),
                    tfidf_cosine_similarity: tfidf.get(i, j),
                    semantic_similarity: semantic.get(i, j),
                }
            })
            .collect();

        let average_similarities = MethodSummaries::from_records(&pairwise_comparisons).ok_or(
            SimilarityError::InsufficientDocuments {
                operation: "aggregate analysis",
                required: 2,
                actual: docs.len(),
            },
        )?;

        tracing::debug!(pairs = pairwise_comparisons.len(), "aggregate analysis done");

        Ok(AggregateReport {
            labels: docs.labels(),
            text_count: docs.len(),
            similarities: SimilarityMatrices {
                tfidf_cosine: tfidf,
                semantic,
            },
            pairwise_comparisons,
            average_similarities,
        })
    }

    /// Top `top_k` pairs by `method`, each pair scored independently
    /// Ties keep the `(i, j)` enumeration order.
    #[tracing::instrument(level = "debug", skip_all, fields(documents = texts.len(), method = %method, top_k = top_k))]
    pub fn find_most_similar_pairs<S, L>(
        &self,
        texts: &[S],
        labels: Option<&[L]>,
        method: SimilarityMethod,
        top_k: usize,
    ) -> Result<Vec<PairResult>>
    where
        S: AsRef<str> + Sync,
        L: AsRef<str>,
    {
        let docs = DocumentSet::new(texts, labels)?;
        docs.require("pair ranking", 2)?;

        let pairs: Vec<(usize, usize)> = docs.pairs().collect();
        // par_iter の collect は順序を保つ
        let results: Vec<PairResult> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let (a, b) = (&docs[i], &docs[j]);
                PairResult {
                    text1_index: i,
                    text2_index: j,
                    text1_label: a.label.clone(),
                    text2_label: b.label.clone(),
                    similarity: self.pair_similarity(&a.text, &b.text, method),
                    method,
                }
            })
            .collect();

        Ok(top_k_pairs(results, top_k))
    }

    /// Seed-scan clustering over the `method` matrix (semantic or tfidf only)
    #[tracing::instrument(level = "debug", skip_all, fields(documents = texts.len(), method = %method, threshold = threshold))]
    pub fn cluster_similar_texts<S, L>(
        &self,
        texts: &[S],
        labels: Option<&[L]>,
        method: SimilarityMethod,
        threshold: f64,
    ) -> Result<Vec<Cluster>>
    where
        S: AsRef<str> + Sync,
        L: AsRef<str>,
    {
        if !method.supports_clustering() {
            return Err(SimilarityError::UnsupportedClusterMethod(method));
        }
        let docs = DocumentSet::new(texts, labels)?;
        docs.require("clustering", 1)?;

        let matrix = self.similarity_matrix(texts, method)?;
        let clusters = greedy_seed_clusters(&matrix, threshold)
            .into_iter()
            .map(|indices| Cluster {
                members: indices
                    .into_iter()
                    .map(|index| ClusterMember {
                        index,
                        label: docs[index].label.clone(),
                        text: docs[index].text.clone(),
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();

        tracing::debug!(clusters = clusters.len(), "clustering done");
        Ok(clusters)
    }
}

fn require_texts(operation: &'static str, actual: usize, required: usize) -> Result<()> {
    if actual < required {
        return Err(SimilarityError::InsufficientDocuments {
            operation,
            required,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::similarity::semantic::testing::TableLoader;
    use crate::tokenizer::CharTokenizer;

    const NO_LABELS: Option<&[&str]> = None;

    fn tfidf_only() -> TextSimilarityAnalyzer {
        TextSimilarityAnalyzer::without_semantic(AnalyzerConfig::default(), CharTokenizer)
    }

    fn with_table(entries: &[(&str, Vec<f32>)]) -> (TextSimilarityAnalyzer, TableLoader) {
        let loader = TableLoader::new(entries);
        let analyzer =
            TextSimilarityAnalyzer::with_loader(AnalyzerConfig::default(), CharTokenizer, &loader);
        (analyzer, loader)
    }

    #[test]
    fn semantic_falls_back_to_tfidf_exactly() {
        let analyzer = tfidf_only();
        let docs = ["今天天氣很好", "今日天氣晴朗", "昨天下雨了"];
        assert!(!analyzer.semantic_model().is_available());
        let semantic = analyzer.semantic_cosine(&docs).unwrap();
        let tfidf = analyzer.tfidf_cosine(&docs).unwrap();
        assert_eq!(semantic, tfidf);
        assert_eq!(
            serde_json::to_vec(&semantic).unwrap(),
            serde_json::to_vec(&tfidf).unwrap()
        );
    }

    #[test]
    fn failed_model_load_falls_back() {
        let mut loader = TableLoader::new(&[("a", vec![1.0, 0.0])]);
        loader.fail_load = true;
        let analyzer =
            TextSimilarityAnalyzer::with_loader(AnalyzerConfig::default(), CharTokenizer, &loader);
        let docs = ["天氣好", "天氣壞"];
        assert_eq!(
            analyzer.semantic_cosine(&docs).unwrap(),
            analyzer.tfidf_cosine(&docs).unwrap()
        );
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn encode_failure_falls_back() {
        let mut loader = TableLoader::new(&[("天氣好", vec![1.0, 0.0])]);
        loader.fail_encode = true;
        let analyzer =
            TextSimilarityAnalyzer::with_loader(AnalyzerConfig::default(), CharTokenizer, &loader);
        assert!(analyzer.semantic_model().is_available());
        let docs = ["天氣好", "天氣壞"];
        assert_eq!(
            analyzer.semantic_cosine(&docs).unwrap(),
            analyzer.tfidf_cosine(&docs).unwrap()
        );
    }

    #[test]
    fn semantic_uses_one_batch_call() {
        let (analyzer, loader) = with_table(&[("x", vec![1.0, 0.0]), ("y", vec![0.0, 1.0])]);
        let matrix = analyzer.semantic_cosine(&["x", "y", "x"]).unwrap();
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert!(matrix.get(0, 1).abs() < 1e-6);
        assert!((matrix.get(0, 2) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tfidf_degenerate_input_is_zero_matrix() {
        let analyzer = tfidf_only();
        let matrix = analyzer.tfidf_cosine(&["", " "]).unwrap();
        assert_eq!(matrix, SimilarityMatrix::zeros(2));
        let empty: [&str; 0] = [];
        assert!(analyzer.tfidf_cosine(&empty).is_err());
        assert!(analyzer.semantic_cosine(&empty).is_err());
    }

    #[test]
    fn aggregate_record_count_and_order() {
        let analyzer = tfidf_only();
        let docs = ["甲乙丙", "乙丙丁", "丙丁戊", "戊己庚"];
        let report = analyzer
            .comprehensive_similarity_analysis(&docs, NO_LABELS)
            .unwrap();
        assert_eq!(report.text_count, 4);
        assert_eq!(report.labels, vec!["Text1", "Text2", "Text3", "Text4"]);
        assert_eq!(report.pairwise_comparisons.len(), 6);
        let order: Vec<_> = report
            .pairwise_comparisons
            .iter()
            .map(|r| (r.text1_index, r.text2_index))
            .collect();
        assert_eq!(order, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);

        for r in &report.pairwise_comparisons {
            assert_eq!(
                r.tfidf_cosine_similarity,
                report.similarities.tfidf_cosine.get(r.text1_index, r.text2_index)
            );
            assert_eq!(r.semantic_similarity, r.tfidf_cosine_similarity);
            assert_eq!(r.jaccard_similarity, analyzer.jaccard_similarity(docs[r.text1_index], docs[r.text2_index]));
        }
        let stats = report.average_similarities.get(SimilarityMethod::Jaccard);
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
    }

    #[test]
    fn aggregate_preconditions() {
        let analyzer = tfidf_only();
        let err = analyzer
            .comprehensive_similarity_analysis(&["one"], NO_LABELS)
            .unwrap_err();
        assert!(matches!(
            err,
            SimilarityError::InsufficientDocuments {
                required: 2,
                actual: 1,
                ..
            }
        ));
        let err = analyzer
            .comprehensive_similarity_analysis(&["a", "b"], Some(&["only"][..]))
            .unwrap_err();
        assert!(matches!(err, SimilarityError::LabelCountMismatch { .. }));

        let report = analyzer
            .comprehensive_similarity_analysis(&["a", "b"], Some(&["甲", "乙"][..]))
            .unwrap();
        assert_eq!(report.pairwise_comparisons[0].text2_label, "乙");
    }

    #[test]
    fn ranking_returns_all_pairs_sorted() {
        let analyzer = tfidf_only();
        let docs = ["aaaa", "aaab", "abcd", "zzzz"];
        let ranked = analyzer
            .find_most_similar_pairs(&docs, NO_LABELS, SimilarityMethod::EditDistance, 100)
            .unwrap();
        assert_eq!(ranked.len(), 6);
        for w in ranked.windows(2) {
            assert!(w[0].similarity >= w[1].similarity);
        }
        assert_eq!((ranked[0].text1_index, ranked[0].text2_index), (0, 1));
        assert!(ranked.iter().all(|p| p.method == SimilarityMethod::EditDistance));

        let top = analyzer
            .find_most_similar_pairs(&docs, NO_LABELS, SimilarityMethod::Jaccard, 2)
            .unwrap();
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn ranking_scores_each_pair_independently() {
        let analyzer = tfidf_only();
        let docs = ["天氣很好", "天氣晴朗", "下雨了"];
        let ranked = analyzer
            .find_most_similar_pairs(&docs, NO_LABELS, SimilarityMethod::Tfidf, 3)
            .unwrap();
        for p in &ranked {
            let expected = analyzer
                .tfidf_cosine(&[docs[p.text1_index], docs[p.text2_index]])
                .unwrap()
                .get(0, 1);
            assert_eq!(p.similarity, expected);
        }
    }

    #[test]
    fn ranking_per_pair_encodes() {
        let (analyzer, loader) = with_table(&[
            ("a", vec![1.0, 0.0]),
            ("b", vec![1.0, 1.0]),
            ("c", vec![0.0, 1.0]),
        ]);
        let ranked = analyzer
            .find_most_similar_pairs(&["a", "b", "c"], NO_LABELS, SimilarityMethod::Semantic, 5)
            .unwrap();
        assert_eq!(loader.calls.load(Ordering::SeqCst), 3);
        assert_eq!(ranked.len(), 3);
        // (0,1) and (1,2) tie, enumeration order wins
        assert_eq!((ranked[0].text1_index, ranked[0].text2_index), (0, 1));
        assert_eq!((ranked[1].text1_index, ranked[1].text2_index), (1, 2));
        assert!(ranked[2].similarity.abs() < 1e-6);
    }

    #[test]
    fn nan_embedding_does_not_top_the_ranking() {
        let (analyzer, _loader) = with_table(&[
            ("甲乙", vec![1.0, 0.0]),
            ("甲乙丙", vec![f32::NAN, 0.0]),
            ("丁戊", vec![0.0, 1.0]),
        ]);
        let docs = ["甲乙", "甲乙丙", "丁戊"];
        let ranked = analyzer
            .find_most_similar_pairs(&docs, NO_LABELS, SimilarityMethod::Semantic, 3)
            .unwrap();
        assert!(ranked.iter().all(|p| p.similarity.is_finite()));
        // the NaN pair falls back to tf-idf
        let fallback = analyzer.tfidf_cosine(&["甲乙", "甲乙丙"]).unwrap().get(0, 1);
        let pair = ranked
            .iter()
            .find(|p| (p.text1_index, p.text2_index) == (0, 1))
            .unwrap();
        assert_eq!(pair.similarity, fallback);
        assert_eq!(
            analyzer.semantic_cosine(&docs).unwrap(),
            analyzer.tfidf_cosine(&docs).unwrap()
        );
    }

    #[test]
    fn clustering_is_seed_only() {
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let (analyzer, _loader) = with_table(&[
            ("a", vec![1.0, 0.0]),
            ("b", vec![half, half]),
            ("c", vec![0.0, 1.0]),
        ]);
        let clusters = analyzer
            .cluster_similar_texts(&["a", "b", "c"], NO_LABELS, SimilarityMethod::Semantic, 0.7)
            .unwrap();
        let indices: Vec<Vec<usize>> = clusters.iter().map(Cluster::indices).collect();
        assert_eq!(indices, vec![vec![0, 1], vec![2]]);
        assert_eq!(clusters[1].members[0].label, "Text3");
        assert_eq!(clusters[1].members[0].text, "c");
    }

    #[test]
    fn clustering_rejects_lexical_methods() {
        let analyzer = tfidf_only();
        let err = analyzer
            .cluster_similar_texts(&["a", "b"], NO_LABELS, SimilarityMethod::Jaccard, 0.5)
            .unwrap_err();
        assert!(matches!(
            err,
            SimilarityError::UnsupportedClusterMethod(SimilarityMethod::Jaccard)
        ));

        let single = analyzer
            .cluster_similar_texts(&["alone"], NO_LABELS, SimilarityMethod::Tfidf, 0.5)
            .unwrap();
        assert_eq!(single.len(), 1);
    }
}
