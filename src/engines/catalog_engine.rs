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

use crate::config::settings::CrawlerSettings;
use crate::domain::models::book::{BookDetail, ListingEntry};
use crate::domain::models::catalog::{detail_url, search_url, Category, SortMode};
use crate::domain::services::extraction_service::ExtractionService;
use crate::engines::traits::{CatalogFetcher, EngineError, ScrapeRequest, ScraperEngine};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// 目录抓取引擎
///
/// 组合底层抓取引擎与提取服务：拼出列表页/详情页URL，取回 HTML 后交给
/// `ExtractionService` 解析。
pub struct CatalogEngine {
    engine: Arc<dyn ScraperEngine>,
    base_search_url: String,
    base_book_url: String,
    page_size: u32,
}

impl CatalogEngine {
    pub fn new(engine: Arc<dyn ScraperEngine>, settings: &CrawlerSettings) -> Self {
        Self {
            engine,
            base_search_url: settings.base_search_url.clone(),
            base_book_url: settings.base_book_url.clone(),
            page_size: settings.page_size,
        }
    }

    async fn fetch_html(&self, url: String) -> Result<String, EngineError> {
        let response = self.engine.scrape(&ScrapeRequest::new(url)).await?;
        Ok(response.content)
    }
}

#[async_trait]
impl CatalogFetcher for CatalogEngine {
    async fn fetch_listing(
        &self,
        category: Category,
        sort: SortMode,
        page: u32,
    ) -> Result<Vec<ListingEntry>, EngineError> {
        let url = search_url(&self.base_search_url, category, sort, self.page_size, page);
        debug!(%url, engine = self.engine.name(), "Loading listing page");

        let html = self.fetch_html(url).await?;
        Ok(ExtractionService::extract_listing(&html))
    }

    async fn fetch_detail(&self, id: &str) -> Result<BookDetail, EngineError> {
        let url = detail_url(&self.base_book_url, id);
        debug!(%url, engine = self.engine.name(), "Loading detail page");

        let html = self.fetch_html(url).await?;
        ExtractionService::extract_detail(&html)
    }
}
