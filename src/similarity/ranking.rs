use crate::similarity::{PairResult, SimilarityMatrix};

/// Sort descending by score and keep the first `top_k`
/// The sort is stable, so equal scores keep their `(i, j)` enumeration order.
pub fn top_k_pairs(mut pairs: Vec<PairResult>, top_k: usize) -> Vec<PairResult> {
    pairs.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    pairs.truncate(top_k);
    pairs
}

/// Greedy seed scan
///
/// Indices are visited in ascending order. Each unvisited index `i` seeds a new
/// cluster and pulls in every unvisited `j > i` with `matrix[i][j] >= threshold`.
/// Only the seed is compared, so membership is not transitive: a document close
/// to a non-seed member but not to the seed starts its own cluster.
///
/// # Returns
/// * `Vec<Vec<usize>>` - member indices per cluster, seed first
pub fn greedy_seed_clusters(matrix: &SimilarityMatrix, threshold: f64) -> Vec<Vec<usize>> {
    let n = matrix.size();
    let mut visited = vec![false; n];
    let mut clusters = Vec::new();

    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let mut cluster = vec![i];
        for j in (i + 1)..n {
            if !visited[j] && matrix.get(i, j) >= threshold {
                cluster.push(j);
                visited[j] = true;
            }
        }
        clusters.push(cluster);
    }
    clusters
}
