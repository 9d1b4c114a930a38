// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::catalog::detail_url;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// 列表页中的单个条目
///
/// 只包含做过滤和去重判断所需的最少字段。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// 目录ID（ASIN）
    pub id: String,
    pub title: String,
    /// 语言标签文本，例如 "Language: English"
    pub language: Option<String>,
    /// 条目元素的完整文本，用于预购/未评分/屏蔽词判断
    pub raw_text: String,
}

/// 详情页抓取结果
///
/// 评分直方图保留原始字符串（可能带千位分隔符），由编排器负责解析和打分。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookDetail {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub author_link: String,
    pub series: String,
    pub series_link: String,
    pub format: String,
    pub image: String,
    pub sample: String,
    pub summary: String,
    pub copyright: String,
    pub tags: Vec<String>,
    pub ratings_overall: Vec<String>,
    pub ratings_performance: Vec<String>,
    pub ratings_story: Vec<String>,
    /// 页面内嵌的 JSON-LD 数据
    pub structured_data: Option<String>,
}

/// 有声书实体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// ASIN，首次成功抓取详情时确定，之后不再改变
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub author_link: String,
    pub series: String,
    pub series_link: String,
    pub format: String,
    pub release_date: Option<NaiveDate>,
    pub image: String,
    pub sample: String,
    pub link: String,
    pub summary: String,
    pub copyright: String,
    pub tags: Vec<String>,
    pub rating: f64,
    pub rating_performance: f64,
    pub rating_story: f64,
    pub duration_in_minutes: i32,
    pub popularity: f64,
}

impl Book {
    /// 由详情页数据构建实体
    ///
    /// 规范化 `format` 中的空白并根据ID生成详情链接；评分、时长、
    /// 发布日期和热度保持默认值，由调用方填充。
    pub fn from_detail(id: &str, detail: BookDetail, base_book_url: &str) -> Self {
        Self {
            id: id.to_string(),
            link: detail_url(base_book_url, id),
            format: normalize_whitespace(&detail.format),
            title: detail.title,
            subtitle: detail.subtitle,
            author: detail.author,
            author_link: detail.author_link,
            series: detail.series,
            series_link: detail.series_link,
            image: detail.image,
            sample: detail.sample,
            summary: detail.summary,
            copyright: detail.copyright,
            tags: detail.tags,
            ..Default::default()
        }
    }
}

/// 将连续空白折叠为单个空格
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}
