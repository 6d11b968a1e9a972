use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zh_text_similarity::{
    AnalyzerConfig, DefaultTfIdfEngine, JiebaTokenizer, SimilarityMethod, TextSimilarityAnalyzer,
    TfIdfVectorizer,
};

const SENTENCES: [&str; 8] = [
    "今天天氣很好，適合出去玩。",
    "今日天氣晴朗，很適合戶外活動。",
    "昨天下雨了，路上很濕。",
    "明天可能會下雪，記得多穿衣服。",
    "這家餐廳的菜很好吃，服務也很周到。",
    "餐廳的服務態度不錯，但是菜有點貴。",
    "我們週末去爬山，山上的風景很美。",
    "山上空氣清新，週末爬山的人很多。",
];

fn corpus(repeat: usize) -> Vec<String> {
    (0..repeat)
        .flat_map(|r| SENTENCES.iter().map(move |s| format!("{}{}", s, r)))
        .collect()
}

fn similarity_benchmark(c: &mut Criterion) {
    let analyzer =
        TextSimilarityAnalyzer::without_semantic(AnalyzerConfig::default(), JiebaTokenizer::new());
    let texts = corpus(4);
    let labels: Option<&[&str]> = None;

    c.bench_function("tfidf_fit_transform", |b| {
        let vectorizer = TfIdfVectorizer::<DefaultTfIdfEngine>::new();
        b.iter(|| {
            vectorizer
                .fit_transform(black_box(&texts), analyzer.tokenizer())
                .map(|m| m.cosine_matrix())
        })
    });

    c.bench_function("comprehensive_similarity_analysis", |b| {
        b.iter(|| analyzer.comprehensive_similarity_analysis(black_box(&texts), labels))
    });

    c.bench_function("find_most_similar_pairs_tfidf", |b| {
        b.iter(|| {
            analyzer.find_most_similar_pairs(black_box(&texts), labels, SimilarityMethod::Tfidf, 5)
        })
    });

    c.bench_function("cluster_similar_texts", |b| {
        b.iter(|| {
            analyzer.cluster_similar_texts(black_box(&texts), labels, SimilarityMethod::Tfidf, 0.5)
        })
    });
}

criterion_group!(benches, similarity_benchmark);
criterion_main!(benches);
