use zh_text_similarity::{AnalyzerConfig, SimilarityMethod, TextSimilarityAnalyzer};

fn main() -> zh_text_similarity::Result<()> {
    // build analyzer (jieba + compiled-in embedding backend, tf-idf fallback)
    let analyzer = TextSimilarityAnalyzer::new(AnalyzerConfig::default())?;

    let texts = [
        "今天天氣很好，適合出去玩。",
        "今日天氣晴朗，很適合戶外活動。",
        "昨天下雨了，路上很濕。",
    ];
    let labels = ["晴天", "晴朗", "雨天"];

    // all methods on every pair
    let report = analyzer.comprehensive_similarity_analysis(&texts, Some(&labels[..]))?;
    println!("{}", report);

    // most similar pairs by tf-idf
    let pairs = analyzer.find_most_similar_pairs(&texts, Some(&labels[..]), SimilarityMethod::Tfidf, 2)?;
    for pair in &pairs {
        println!("{}", pair);
    }

    // clusters
    let clusters = analyzer.cluster_similar_texts(&texts, Some(&labels[..]), SimilarityMethod::Semantic, 0.3)?;
    for cluster in &clusters {
        println!("{}", cluster);
    }

    // debug
    println!("semantic model available: {}", analyzer.semantic_model().is_available());
    println!("{}", report.to_json_pretty()?);
    Ok(())
}
