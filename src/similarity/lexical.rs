//! Lexical similarity methods
//!
//! Stateless functions over a single text pair. All of them are symmetric and
//! bounded to `[0, 1]`, empty strings included.

use crate::tokenizer::Tokenizer;

/// Jaccard similarity of the two token sets
/// `|A ∩ B| / |A ∪ B|`, 0.0 when both sides produce no token.
pub fn jaccard_similarity(tokenizer: &dyn Tokenizer, text1: &str, text2: &str) -> f64 {
    let set1 = tokenizer.token_set(text1);
    let set2 = tokenizer.token_set(text2);

    let intersection = set1.intersection(&set2).count();
    let union = set1.len() + set2.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Levenshtein distance over `char`s
/// Insertion, deletion and substitution all cost 1. Keeps a single row sized
/// by the shorter text.
pub fn levenshtein_distance(text1: &str, text2: &str) -> usize {
    let a: Vec<char> = text1.chars().collect();
    let b: Vec<char> = text2.chars().collect();
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();
    for (i, lc) in long.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let above = row[j + 1];
            let cost = if lc == sc { 0 } else { 1 };
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }
    row[short.len()]
}

/// `1 - distance / max(len1, len2)`, 1.0 for two empty texts
pub fn edit_distance_similarity(text1: &str, text2: &str) -> f64 {
    let max_len = text1.chars().count().max(text2.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(text1, text2) as f64 / max_len as f64
}

/// Dice-style overlap of the token multisets
/// `2 * Σ min(count_A, count_B) / (total_A + total_B)`, 0.0 when both are empty.
pub fn word_overlap_similarity(tokenizer: &dyn Tokenizer, text1: &str, text2: &str) -> f64 {
    let freq1 = tokenizer.token_frequency(text1);
    let freq2 = tokenizer.token_frequency(text2);

    let total = freq1.token_sum() + freq2.token_sum();
    if total == 0 {
        return 0.0;
    }
    2.0 * freq1.overlap(&freq2) as f64 / total as f64
}
