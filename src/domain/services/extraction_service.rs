// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::book::{BookDetail, ListingEntry};
use crate::engines::traits::EngineError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// 选择器表
///
/// 站点结构变化时只需要修改这里。
mod selectors {
    use super::*;

    fn parse(css: &str) -> Selector {
        Selector::parse(css).unwrap()
    }

    pub static LISTING_ITEM: Lazy<Selector> = Lazy::new(|| parse(".productListItem"));
    pub static LISTING_TITLE: Lazy<Selector> = Lazy::new(|| parse("h3 > a"));
    pub static LISTING_LANGUAGE: Lazy<Selector> = Lazy::new(|| parse(".languageLabel"));
    pub static SAMPLE_BUTTON: Lazy<Selector> = Lazy::new(|| parse("[id*=sample-player] > button"));

    pub static DETAIL_ROOT: Lazy<Selector> = Lazy::new(|| parse("body > div.adbl-page"));
    pub static TITLE: Lazy<Selector> = Lazy::new(|| parse("h1"));
    pub static SUBTITLE: Lazy<Selector> =
        Lazy::new(|| parse(".bc-col-5 span ul li:nth-child(2)"));
    pub static AUTHOR: Lazy<Selector> = Lazy::new(|| parse(".authorLabel > a"));
    pub static SERIES: Lazy<Selector> = Lazy::new(|| parse(".seriesLabel > a"));
    pub static FORMAT: Lazy<Selector> = Lazy::new(|| parse(".format"));
    pub static IMAGE: Lazy<Selector> =
        Lazy::new(|| parse("#center-1 .bc-col-3 > div > div:nth-child(1) > img"));
    pub static SUMMARY: Lazy<Selector> =
        Lazy::new(|| parse("#center-9 > div > div > div:nth-child(2) > span"));
    pub static COPYRIGHT: Lazy<Selector> =
        Lazy::new(|| parse("#center-9 > div > div > div:nth-child(3) > span"));
    pub static TAGS: Lazy<Selector> = Lazy::new(|| parse("#center-10 span.bc-chip-text"));
    pub static RATINGS_OVERALL: Lazy<Selector> = Lazy::new(|| {
        parse("#center-16 .bc-row-responsive > div:nth-child(1) li.histogram-rating span:nth-child(5)")
    });
    pub static RATINGS_PERFORMANCE: Lazy<Selector> = Lazy::new(|| {
        parse("#center-16 .bc-row-responsive > div:nth-child(2) li.histogram-rating span:nth-child(5)")
    });
    pub static RATINGS_STORY: Lazy<Selector> = Lazy::new(|| {
        parse("#center-16 .bc-row-responsive > div:nth-child(3) li.histogram-rating span:nth-child(5)")
    });
    pub static STRUCTURED_DATA: Lazy<Selector> =
        Lazy::new(|| parse("script[type='application/ld+json']"));
}

/// 提取服务
///
/// 负责从列表页和详情页 HTML 中提取结构化数据。
/// 返回值是一次性的有限序列，调用方直接消费，不需要回调。
pub struct ExtractionService;

impl ExtractionService {
    /// 提取列表页中的全部条目，保持页面顺序
    pub fn extract_listing(html: &str) -> Vec<ListingEntry> {
        let document = Html::parse_document(html);

        document
            .select(&selectors::LISTING_ITEM)
            .map(|item| ListingEntry {
                id: first_attr(item, &selectors::SAMPLE_BUTTON, "sample-asin"),
                title: first_text(item, &selectors::LISTING_TITLE),
                language: Some(first_text(item, &selectors::LISTING_LANGUAGE))
                    .filter(|l| !l.is_empty()),
                raw_text: element_text(item),
            })
            .collect()
    }

    /// 提取详情页
    ///
    /// 页面中找不到详情根节点时视为解析失败。
    pub fn extract_detail(html: &str) -> Result<BookDetail, EngineError> {
        let document = Html::parse_document(html);
        let root = document
            .select(&selectors::DETAIL_ROOT)
            .next()
            .ok_or_else(|| EngineError::Parse("detail page root not found".to_string()))?;

        let structured_data = root
            .select(&selectors::STRUCTURED_DATA)
            .map(|script| script.text().collect::<String>())
            .find(|text| !text.trim().is_empty());

        Ok(BookDetail {
            id: first_attr(root, &selectors::SAMPLE_BUTTON, "sample-asin"),
            title: first_text(root, &selectors::TITLE),
            subtitle: first_text(root, &selectors::SUBTITLE),
            author: first_text(root, &selectors::AUTHOR),
            author_link: first_attr(root, &selectors::AUTHOR, "href"),
            series: first_text(root, &selectors::SERIES),
            series_link: first_attr(root, &selectors::SERIES, "href"),
            format: first_text(root, &selectors::FORMAT),
            image: first_attr(root, &selectors::IMAGE, "src"),
            sample: first_attr(root, &selectors::SAMPLE_BUTTON, "data-mp3"),
            summary: root
                .select(&selectors::SUMMARY)
                .next()
                .map(|e| e.inner_html().trim().to_string())
                .unwrap_or_default(),
            copyright: first_text(root, &selectors::COPYRIGHT),
            tags: all_text(root, &selectors::TAGS),
            ratings_overall: all_text(root, &selectors::RATINGS_OVERALL),
            ratings_performance: all_text(root, &selectors::RATINGS_PERFORMANCE),
            ratings_story: all_text(root, &selectors::RATINGS_STORY),
            structured_data,
        })
    }
}

fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(scope: ElementRef, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn first_attr(scope: ElementRef, selector: &Selector, attr: &str) -> String {
    scope
        .select(selector)
        .find_map(|e| e.value().attr(attr))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn all_text(scope: ElementRef, selector: &Selector) -> Vec<String> {
    scope
        .select(selector)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}
