use std::cmp::Ordering;

use num::Num;

pub trait Compare<N>
where
    N: Num + Copy,
{
    /// コサイン類似度 (密ベクトル)
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    /// ||a|| = sqrt(Σ(a_i^2))
    /// どちらかのノルムが 0 なら 0.0
    fn cosine_similarity(vec: impl Iterator<Item = N>, other: impl Iterator<Item = N>) -> f64;

    /// コサイン類似度 (index 昇順の疎ベクトル)
    fn sparse_cosine_similarity(
        vec: impl Iterator<Item = (usize, N)>,
        other: impl Iterator<Item = (usize, N)>,
    ) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCompare;

impl<N> Compare<N> for DefaultCompare
where
    N: Num + Copy + Into<f64>,
{
    #[inline]
    fn cosine_similarity(vec: impl Iterator<Item = N>, other: impl Iterator<Item = N>) -> f64 {
        let mut norm_a = 0_f64;
        let mut norm_b = 0_f64;
        let mut dot = 0_f64;
        for (a, b) in vec.zip(other) {
            let (a, b): (f64, f64) = (a.into(), b.into());
            norm_a += a * a;
            norm_b += b * b;
            dot += a * b;
        }
        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot / (norm_a.sqrt() * norm_b.sqrt())
        }
    }

    #[inline]
    fn sparse_cosine_similarity(
        vec: impl Iterator<Item = (usize, N)>,
        other: impl Iterator<Item = (usize, N)>,
    ) -> f64 {
        let mut a_it = vec.fuse();
        let mut b_it = other.fuse();
        let mut a_next = a_it.next();
        let mut b_next = b_it.next();
        let mut norm_a = 0_f64;
        let mut norm_b = 0_f64;
        let mut dot = 0_f64;
        while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
            let (va, vb): (f64, f64) = (va.into(), vb.into());
            match ia.cmp(&ib) {
                Ordering::Equal => {
                    norm_a += va * va;
                    norm_b += vb * vb;
                    dot += va * vb;
                    a_next = a_it.next();
                    b_next = b_it.next();
                }
                Ordering::Less => {
                    norm_a += va * va;
                    a_next = a_it.next();
                }
                Ordering::Greater => {
                    norm_b += vb * vb;
                    b_next = b_it.next();
                }
            }
        }
        while let Some((_, va)) = a_next {
            let va: f64 = va.into();
            norm_a += va * va;
            a_next = a_it.next();
        }
        while let Some((_, vb)) = b_next {
            let vb: f64 = vb.into();
            norm_b += vb * vb;
            b_next = b_it.next();
        }
        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot / (norm_a.sqrt() * norm_b.sqrt())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_cosine_f32_and_f64_agree() {
        let a32 = [1.0f32, 2.0, 0.0];
        let b32 = [2.0f32, 1.0, 1.0];
        let a64 = [1.0f64, 2.0, 0.0];
        let b64 = [2.0f64, 1.0, 1.0];
        let c32 = <DefaultCompare as Compare<f32>>::cosine_similarity(a32.iter().copied(), b32.iter().copied());
        let c64 = <DefaultCompare as Compare<f64>>::cosine_similarity(a64.iter().copied(), b64.iter().copied());
        assert!((c32 - c64).abs() < 1e-9);
        assert!((c64 - 4.0 / (5.0f64.sqrt() * 6.0f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn zero_vector_gives_zero() {
        let zero = [0.0f64; 3];
        let other = [1.0f64, 1.0, 1.0];
        let c = <DefaultCompare as Compare<f64>>::cosine_similarity(zero.iter().copied(), other.iter().copied());
        assert_eq!(c, 0.0);
    }

    #[test]
    fn sparse_matches_dense() {
        let a = vec![(0usize, 1.0f64), (3, 2.0)];
        let b = vec![(1usize, 4.0f64), (3, 1.0), (5, 2.0)];
        let sparse = <DefaultCompare as Compare<f64>>::sparse_cosine_similarity(a.iter().copied(), b.iter().copied());
        let dense_a = [1.0, 0.0, 0.0, 2.0, 0.0, 0.0];
        let dense_b = [0.0, 4.0, 0.0, 1.0, 0.0, 2.0];
        let dense = <DefaultCompare as Compare<f64>>::cosine_similarity(dense_a.iter().copied(), dense_b.iter().copied());
        assert!((sparse - dense).abs() < 1e-12);
        let self_sim = <DefaultCompare as Compare<f64>>::sparse_cosine_similarity(a.iter().copied(), a.iter().copied());
        assert!((self_sim - 1.0).abs() < 1e-12);
    }
}
