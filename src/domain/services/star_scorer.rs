// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 星级评分聚合
//!
//! 对五档星级直方图计算 Wilson 置信区间下界，
//! 参见 http://www.evanmiller.org/ranking-items-with-star-ratings.html

use thiserror::Error;

/// 五档计数，依次为 5 星、4 星、3 星、2 星、1 星
pub type StarCounts = [u64; 5];

/// 置信系数（约 90% 单侧）
const Z: f64 = 1.65;
const WEIGHTS: [f64; 5] = [5.0, 4.0, 3.0, 2.0, 1.0];
const WEIGHTS_SQUARED: [f64; 5] = [25.0, 16.0, 9.0, 4.0, 1.0];

/// 直方图解析错误
#[derive(Error, Debug, PartialEq)]
pub enum HistogramError {
    #[error("expected 5 histogram buckets, got {0}")]
    WrongLength(usize),
    #[error("invalid histogram count: {0:?}")]
    InvalidCount(String),
}

/// 计算星级评分
///
/// 全零输入也有定义（分母含 K=5），得到一个较低的基线分数。
pub fn star_score(counts: &StarCounts) -> f64 {
    let n: u64 = counts.iter().sum();
    let k = counts.len() as f64;
    let total = n as f64;

    let mean = weighted_mean(&WEIGHTS, counts, total, k);
    let mean_of_squares = weighted_mean(&WEIGHTS_SQUARED, counts, total, k);

    mean - Z * ((mean_of_squares - mean * mean) / (total + k + 1.0)).sqrt()
}

fn weighted_mean(weights: &[f64; 5], counts: &StarCounts, total: f64, k: f64) -> f64 {
    let weighted: f64 = weights
        .iter()
        .zip(counts.iter())
        .map(|(w, c)| w * (*c as f64 + 1.0))
        .sum();
    weighted / (total + k)
}

/// 解析页面上的直方图计数
///
/// 计数可能带千位分隔符，例如 `"1,234"`。
pub fn parse_histogram<S: AsRef<str>>(raw: &[S]) -> Result<StarCounts, HistogramError> {
    if raw.len() != 5 {
        return Err(HistogramError::WrongLength(raw.len()));
    }

    let mut counts = [0u64; 5];
    for (slot, value) in counts.iter_mut().zip(raw) {
        let cleaned: String = value
            .as_ref()
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();
        *slot = cleaned
            .parse()
            .map_err(|_| HistogramError::InvalidCount(value.as_ref().to_string()))?;
    }
    Ok(counts)
}
