use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

///  TokenFrequency 構造体
/// tokenの出現頻度を管理するための構造体です
/// 初出順を保持するので、語彙の次元順がドキュメント順に決まります
///
/// # Examples
/// ```
/// use zh_text_similarity::TokenFrequency;
/// let mut token_freq = TokenFrequency::new();
/// token_freq.add_token("天氣");
/// token_freq.add_token("很好");
/// token_freq.add_token("天氣");
///
/// assert_eq!(token_freq.token_count("天氣"), 2);
/// assert_eq!(token_freq.token_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u32>,
    total_token_count: u64,
}

/// Tokenの追加、削除の実装
impl TokenFrequency {
    /// 新しいTokenFrequencyを作成するメソッド
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// tokenを追加する
    ///
    /// # Arguments
    /// * `token` - 追加するトークン
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        let count = self.token_count.entry(token.to_string()).or_insert(0);
        *count += 1;
        self.total_token_count += 1;
        self
    }

    /// 条件に基づいてtokenを削除します
    ///
    /// # Arguments
    /// * `condition` - 条件を満たすtokenを削除するクロージャ
    ///
    /// # Returns
    /// * `u64` - 削除されたtokenの合計数
    #[inline]
    pub fn remove_tokens_by_condition<F>(&mut self, condition: F) -> u64
    where
        F: Fn(&str, &u32) -> bool,
    {
        let mut removed_total_count: u64 = 0;
        self.token_count.retain(|token, count| {
            if condition(token, count) {
                removed_total_count += *count as u64;
                false
            } else {
                true
            }
        });
        self.total_token_count -= removed_total_count;
        removed_total_count
    }
}

impl<T> FromIterator<T> for TokenFrequency
where
    T: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut freq = TokenFrequency::new();
        for token in iter {
            freq.add_token(token.as_ref());
        }
        freq
    }
}

/// TokenFrequencyの情報を取得するための実装
impl TokenFrequency {
    /// 全tokenのカウントの合計を取得します
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// あるtokenの出現回数を取得します
    ///
    /// # Arguments
    /// * `token` - トークン
    ///
    /// # Returns
    /// * `u32` - トークンの出現回数
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        *self.token_count.get(token).unwrap_or(&0)
    }

    /// 出現した単語数 (ユニーク) を取得します
    #[inline]
    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    /// (token, count) を初出順に走査します
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.token_count.iter().map(|(token, &count)| (token.as_str(), count))
    }

    /// tokenのsetを取得します (初出順)
    #[inline]
    pub fn token_set_ref_str(&self) -> Vec<&str> {
        self.token_count.keys().map(|s| s.as_str()).collect()
    }

    /// 多重集合としての共通部分の大きさ
    /// Σ min(count_self(t), count_other(t))
    ///
    /// # Arguments
    /// * `other` - 比較対象
    ///
    /// # Returns
    /// * `u64` - 共通するtokenの合計数
    #[inline]
    pub fn overlap(&self, other: &TokenFrequency) -> u64 {
        // 小さい方を走査する
        let (small, large) = if self.token_num() <= other.token_num() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .token_count
            .iter()
            .map(|(token, &count)| count.min(large.token_count(token)) as u64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_order() {
        let freq: TokenFrequency = ["今天", "天氣", "今天", "。"].into_iter().collect();
        assert_eq!(freq.token_sum(), 4);
        assert_eq!(freq.token_num(), 3);
        assert_eq!(freq.token_count("今天"), 2);
        assert_eq!(freq.token_count("明天"), 0);
        assert_eq!(freq.token_set_ref_str(), vec!["今天", "天氣", "。"]);
    }

    #[test]
    fn multiset_overlap() {
        let a: TokenFrequency = ["a", "a", "b", "c"].into_iter().collect();
        let b: TokenFrequency = ["a", "b", "b", "d"].into_iter().collect();
        // min(2,1) + min(1,2) = 2
        assert_eq!(a.overlap(&b), 2);
        assert_eq!(b.overlap(&a), 2);
        assert_eq!(a.overlap(&TokenFrequency::new()), 0);
    }

    #[test]
    fn remove_by_condition_keeps_total_consistent() {
        let mut freq: TokenFrequency = ["的", "的", "天氣", "，"].into_iter().collect();
        let removed = freq.remove_tokens_by_condition(|token, _| token == "的");
        assert_eq!(removed, 2);
        assert_eq!(freq.token_sum(), 2);
        assert_eq!(freq.token_count("的"), 0);
        assert_eq!(freq.token_set_ref_str(), vec!["天氣", "，"]);
    }
}
