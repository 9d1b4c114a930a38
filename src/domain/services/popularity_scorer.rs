// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::catalog::SortMode;

/// 默认热度上限
pub const DEFAULT_TOP_SCORE: f64 = 250.0;
/// 默认每个排名位置的衰减系数
pub const DEFAULT_DECAY_FACTOR: f64 = 0.9794;

/// 热度累加器
///
/// 在一次（分类，排序）遍历中按列表位置生成逐级衰减的热度分数。
/// 每个遍历必须使用新的实例，状态不能跨遍历共享。
#[derive(Debug, Clone)]
pub struct PopularityScorer {
    cursor: f64,
    decay_factor: f64,
}

impl PopularityScorer {
    pub fn new(top_score: f64, decay_factor: f64) -> Self {
        Self {
            cursor: top_score,
            decay_factor,
        }
    }

    /// 消耗一个排名位置并返回该位置的热度
    ///
    /// 非排名敏感的排序方式恒返回 0 且不移动游标。游标衰减到 1.0 以下后
    /// 直接归零，之后所有位置都返回 0。返回值是内部值的两倍（0-500）。
    pub fn next(&mut self, sort: SortMode) -> f64 {
        if !sort.is_rank_sensitive() {
            return 0.0;
        }

        let current = self.cursor;
        self.cursor *= self.decay_factor;
        if self.cursor < 1.0 {
            self.cursor = 0.0;
        }
        current * 2.0
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }
}

impl Default for PopularityScorer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_SCORE, DEFAULT_DECAY_FACTOR)
    }
}
