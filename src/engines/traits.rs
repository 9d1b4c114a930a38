// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::book::{BookDetail, ListingEntry};
use crate::domain::models::catalog::{Category, SortMode};
use async_trait::async_trait;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("Unexpected status: {0}")]
    Status(u16),
    /// 页面解析失败
    #[error("Parse error: {0}")]
    Parse(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 抓取请求
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    /// 目标URL
    pub url: String,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// 抓取响应
#[derive(Debug, Clone)]
pub struct ScrapeResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 响应内容
    pub content: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 抓取引擎特质
///
/// 只负责取回页面内容，不关心页面结构。
#[async_trait]
pub trait ScraperEngine: Send + Sync {
    /// 执行抓取
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}

/// 目录抓取特质
///
/// 编排器依赖的抓取/提取协作方：给定列表页或详情页坐标，返回结构化记录。
/// 选择器失效和网络策略都属于实现方的职责。
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// 抓取一个列表页，按页面顺序返回条目
    async fn fetch_listing(
        &self,
        category: Category,
        sort: SortMode,
        page: u32,
    ) -> Result<Vec<ListingEntry>, EngineError>;

    /// 抓取一个详情页
    async fn fetch_detail(&self, id: &str) -> Result<BookDetail, EngineError>;
}
