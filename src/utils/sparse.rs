use std::ops::{AddAssign, MulAssign};

use num::Num;
use serde::{Deserialize, Serialize};

/// SparseVecは0要素を疎とした疎ベクトルです
/// indices と values を持ち、indices の昇順でソートされていることを保証します
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVec<N = f64>
where
    N: Num,
{
    len: usize,
    indices: Vec<usize>,
    values: Vec<N>,
}

impl<N> SparseVec<N>
where
    N: Num + Copy,
{
    /// 長さ `len` のゼロベクトル
    pub fn new(len: usize) -> Self {
        Self {
            len,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn with_capacity(len: usize, nnz: usize) -> Self {
        Self {
            len,
            indices: Vec::with_capacity(nnz),
            values: Vec::with_capacity(nnz),
        }
    }

    /// (index, value) の組から構築します
    /// 0 の値は捨て、index でソートします。重複した index は加算されます
    pub fn from_pairs(len: usize, pairs: impl IntoIterator<Item = (usize, N)>) -> Self
    where
        N: AddAssign,
    {
        let mut pairs: Vec<(usize, N)> = pairs
            .into_iter()
            .filter(|(idx, val)| *idx < len && !val.is_zero())
            .collect();
        pairs.sort_by_key(|(idx, _)| *idx);

        let mut vec = Self::with_capacity(len, pairs.len());
        for (idx, val) in pairs {
            match vec.indices.last() {
                Some(&last) if last == idx => {
                    if let Some(v) = vec.values.last_mut() {
                        *v += val;
                    }
                }
                _ => {
                    vec.indices.push(idx);
                    vec.values.push(val);
                }
            }
        }
        vec
    }

    /// 次元数
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 非ゼロ要素数
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// index の値 (範囲外/疎の場合は 0)
    #[inline]
    pub fn get(&self, index: usize) -> N {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => N::zero(),
        }
    }

    /// 非ゼロ要素を index 昇順で走査します
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// 全要素にスカラーを掛けます
    #[inline]
    pub fn scale(&mut self, factor: N)
    where
        N: MulAssign,
    {
        for v in self.values.iter_mut() {
            *v *= factor;
        }
    }

    /// 密ベクトルに展開します
    pub fn to_dense(&self) -> Vec<N> {
        let mut dense = vec![N::zero(); self.len];
        for (idx, val) in self.raw_iter() {
            dense[idx] = val;
        }
        dense
    }
}

impl SparseVec<f64> {
    /// L2ノルム
    #[inline]
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// L2 正規化 (ゼロベクトルはそのまま)
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            self.scale(1.0 / norm);
        }
    }
}
