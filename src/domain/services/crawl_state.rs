// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;

/// 屏蔽列表
///
/// 启动时从存储加载一次，之后只读。
#[derive(Debug, Clone, Default)]
pub struct BanLists {
    tags: HashSet<String>,
    /// 已转为小写
    words: Vec<String>,
}

impl BanLists {
    pub fn new<T, W>(tags: T, words: W) -> Self
    where
        T: IntoIterator<Item = String>,
        W: IntoIterator<Item = String>,
    {
        let words = words
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        Self {
            tags: tags.into_iter().collect(),
            words,
        }
    }

    /// 标签精确匹配
    pub fn is_banned_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// 返回第一个命中的屏蔽标签
    pub fn first_banned_tag<'a, S: AsRef<str>>(&self, tags: &'a [S]) -> Option<&'a str> {
        tags.iter()
            .map(|tag| tag.as_ref())
            .find(|tag| self.is_banned_tag(tag))
    }

    /// 屏蔽词子串匹配，不区分大小写
    pub fn contains_banned_word(&self, text: &str) -> bool {
        if self.words.is_empty() {
            return false;
        }
        let text = text.to_lowercase();
        self.words.iter().any(|word| text.contains(word.as_str()))
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

/// 去重与过滤状态
///
/// 已见ID集合在进程生命周期内只增不减；屏蔽列表只读。
/// 只由编排器独占持有，不做并发同步。
#[derive(Debug, Default)]
pub struct CrawlState {
    seen: HashSet<String>,
    bans: BanLists,
}

impl CrawlState {
    pub fn new<I>(known_ids: I, bans: BanLists) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            seen: known_ids.into_iter().collect(),
            bans,
        }
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// 幂等插入
    pub fn mark_known(&mut self, id: &str) {
        if !self.seen.contains(id) {
            self.seen.insert(id.to_string());
        }
    }

    pub fn known_count(&self) -> usize {
        self.seen.len()
    }

    pub fn bans(&self) -> &BanLists {
        &self.bans
    }
}
