use serde::{Deserialize, Serialize};

use crate::error::SimilarityError;

/// n×n symmetric similarity matrix
/// Serialized as plain nested arrays (heatmap / network renderers read it as is).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct SimilarityMatrix {
    size: usize,
    /// row-major, size * size
    values: Vec<f64>,
}

/// One edge of the similarity network
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

impl SimilarityMatrix {
    /// all-zero matrix, diagonal included
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    /// Build from `f(i, j)` evaluated on the upper triangle (diagonal included)
    /// and mirrored to the lower one.
    pub fn from_symmetric_fn<F>(size: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut matrix = Self::zeros(size);
        for i in 0..size {
            for j in i..size {
                let value = f(i, j);
                matrix.values[i * size + j] = value;
                matrix.values[j * size + i] = value;
            }
        }
        matrix
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Value at (i, j); panics when out of range, like slice indexing
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "index ({i}, {j}) out of range for {0}x{0} matrix", self.size);
        self.values[i * self.size + j]
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    /// Nested rows
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }

    /// Values of the strict upper triangle in (i, j) order
    pub fn upper_triangle(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.size).flat_map(move |i| ((i + 1)..self.size).map(move |j| (i, j, self.get(i, j))))
    }

    /// Edges `(i, j)`, `i < j`, whose score is strictly above `threshold`
    pub fn network_edges(&self, threshold: f64) -> Vec<NetworkEdge> {
        self.upper_triangle()
            .filter(|&(_, _, weight)| weight > threshold)
            .map(|(source, target, weight)| NetworkEdge {
                source,
                target,
                weight,
            })
            .collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for SimilarityMatrix {
    type Error = SimilarityError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(SimilarityError::InvalidMatrix(format!(
                    "row {} has {} column(s), expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            values.extend(row);
        }
        Ok(Self { size, values })
    }
}

impl From<SimilarityMatrix> for Vec<Vec<f64>> {
    fn from(matrix: SimilarityMatrix) -> Self {
        matrix.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_construction_evaluates_upper_triangle_once() {
        let mut calls = 0;
        let matrix = SimilarityMatrix::from_symmetric_fn(3, |i, j| {
            calls += 1;
            if i == j {
                1.0
            } else {
                (i + j) as f64 / 10.0
            }
        });
        assert_eq!(calls, 6);
        assert_eq!(matrix.get(0, 2), 0.2);
        assert_eq!(matrix.get(2, 0), 0.2);
        assert_eq!(matrix.row(1), &[0.1, 1.0, 0.3]);
    }

    #[test]
    fn network_edges_use_strict_threshold() {
        let matrix = SimilarityMatrix::try_from(vec![
            vec![1.0, 0.5, 0.8],
            vec![0.5, 1.0, 0.2],
            vec![0.8, 0.2, 1.0],
        ])
        .unwrap();
        let edges = matrix.network_edges(0.5);
        assert_eq!(
            edges,
            vec![NetworkEdge {
                source: 0,
                target: 2,
                weight: 0.8
            }]
        );
    }

    #[test]
    fn serializes_as_nested_arrays() {
        let matrix = SimilarityMatrix::from_symmetric_fn(2, |i, j| if i == j { 1.0 } else { 0.25 });
        let json = serde_json::to_string(&matrix).unwrap();
        assert_eq!(json, "[[1.0,0.25],[0.25,1.0]]");
        let back: SimilarityMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, matrix);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let result: Result<SimilarityMatrix, _> = serde_json::from_str("[[1.0,0.5],[0.5]]");
        assert!(result.is_err());
        assert!(SimilarityMatrix::try_from(Vec::<Vec<f64>>::new()).unwrap().is_empty());
    }
}
