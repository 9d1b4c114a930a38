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

use crate::config::settings::{CrawlerSettings, PopularitySettings};
use crate::domain::models::book::{Book, BookDetail, ListingEntry};
use crate::domain::models::catalog::{Category, SortMode};
use crate::domain::repositories::book_repository::{BookRepository, RepositoryError};
use crate::domain::services::crawl_state::{BanLists, CrawlState};
use crate::domain::services::popularity_scorer::PopularityScorer;
use crate::domain::services::star_scorer::{parse_histogram, star_score};
use crate::domain::services::structured_data::StructuredData;
use crate::engines::traits::CatalogFetcher;
use crate::utils::errors::CrawlError;
use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

static PRE_ORDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)pre-?order").unwrap());
static NOT_RATED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Not\srated\syet").unwrap());

/// 列表条目被跳过的原因
///
/// 变体顺序即过滤器的判定顺序，命中第一个即停止。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingId,
    Language,
    PreOrder,
    NotRated,
    BannedWord,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MissingId => "missing id",
            SkipReason::Language => "language",
            SkipReason::PreOrder => "pre-order",
            SkipReason::NotRated => "not rated",
            SkipReason::BannedWord => "banned word",
        };
        f.write_str(text)
    }
}

/// 单次（或累计）遍历的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_fetched: u64,
    pub pages_failed: u64,
    pub entries_seen: u64,
    pub skipped_missing_id: u64,
    pub skipped_language: u64,
    pub skipped_pre_order: u64,
    pub skipped_not_rated: u64,
    pub skipped_banned_word: u64,
    pub duplicates: u64,
    pub details_fetched: u64,
    pub details_failed: u64,
    pub banned_tag_discards: u64,
    pub inserted: u64,
    pub popularity_updates: u64,
    pub write_failures: u64,
}

impl CrawlStats {
    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::MissingId => self.skipped_missing_id += 1,
            SkipReason::Language => self.skipped_language += 1,
            SkipReason::PreOrder => self.skipped_pre_order += 1,
            SkipReason::NotRated => self.skipped_not_rated += 1,
            SkipReason::BannedWord => self.skipped_banned_word += 1,
        }
    }

    pub fn skipped(&self) -> u64 {
        self.skipped_missing_id
            + self.skipped_language
            + self.skipped_pre_order
            + self.skipped_not_rated
            + self.skipped_banned_word
    }

    /// 累加另一份统计
    pub fn merge(&mut self, other: &CrawlStats) {
        self.pages_fetched += other.pages_fetched;
        self.pages_failed += other.pages_failed;
        self.entries_seen += other.entries_seen;
        self.skipped_missing_id += other.skipped_missing_id;
        self.skipped_language += other.skipped_language;
        self.skipped_pre_order += other.skipped_pre_order;
        self.skipped_not_rated += other.skipped_not_rated;
        self.skipped_banned_word += other.skipped_banned_word;
        self.duplicates += other.duplicates;
        self.details_fetched += other.details_fetched;
        self.details_failed += other.details_failed;
        self.banned_tag_discards += other.banned_tag_discards;
        self.inserted += other.inserted;
        self.popularity_updates += other.popularity_updates;
        self.write_failures += other.write_failures;
    }

    fn publish(&self, category: Category, sort: SortMode) {
        let (category, sort) = (category.slug(), sort.slug());
        counter!("laudrs_runs_total", "category" => category, "sort" => sort).increment(1);
        counter!("laudrs_listing_pages_total", "category" => category, "sort" => sort)
            .increment(self.pages_fetched);
        counter!("laudrs_listing_page_failures_total", "category" => category, "sort" => sort)
            .increment(self.pages_failed);
        counter!("laudrs_items_skipped_total", "category" => category, "sort" => sort)
            .increment(self.skipped());
        counter!("laudrs_books_inserted_total", "category" => category, "sort" => sort)
            .increment(self.inserted);
        counter!("laudrs_popularity_updates_total", "category" => category, "sort" => sort)
            .increment(self.popularity_updates);
        counter!("laudrs_detail_failures_total", "category" => category, "sort" => sort)
            .increment(self.details_failed);
        counter!("laudrs_write_failures_total", "category" => category, "sort" => sort)
            .increment(self.write_failures);
    }
}

/// 一次（分类，排序）遍历的上下文
///
/// 热度游标属于单次遍历，遍历结束即丢弃。
struct CrawlRun {
    category: Category,
    sort: SortMode,
    scorer: PopularityScorer,
    stats: CrawlStats,
}

/// 爬取服务
///
/// 按静态顺序遍历（分类，排序）矩阵，对每个列表条目做过滤、标签回填、
/// 去重和详情抓取，并把结果写入仓库。全部调用顺序执行，状态由本服务独占。
pub struct CrawlService<F: CatalogFetcher, R: BookRepository> {
    /// 列表页与详情页抓取器
    fetcher: Arc<F>,
    /// 有声书仓库
    repo: Arc<R>,
    /// 去重与过滤状态
    state: CrawlState,
    crawler: CrawlerSettings,
    popularity: PopularitySettings,
}

impl<F: CatalogFetcher, R: BookRepository> CrawlService<F, R> {
    /// 创建爬取服务并从仓库预加载状态
    ///
    /// 依次加载已入库ID、屏蔽标签和屏蔽词。
    ///
    /// # 参数
    ///
    /// * `fetcher` - 列表页与详情页抓取器
    /// * `repo` - 有声书仓库
    /// * `crawler` - 爬虫配置
    /// * `popularity` - 热度配置
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlService)` - 已完成预加载的服务
    /// * `Err(CrawlError::Bootstrap)` - 仓库不可用，调用方应终止进程
    pub async fn bootstrap(
        fetcher: Arc<F>,
        repo: Arc<R>,
        crawler: CrawlerSettings,
        popularity: PopularitySettings,
    ) -> Result<Self, CrawlError> {
        let known = repo.load_known_ids().await?;
        let banned_tags = repo.load_banned_tags().await?;
        let banned_words = repo.load_banned_words().await?;

        let bans = BanLists::new(banned_tags, banned_words);
        info!(
            known = known.len(),
            banned_tags = bans.tag_count(),
            banned_words = bans.word_count(),
            "Crawl state loaded"
        );

        Ok(Self {
            fetcher,
            repo,
            state: CrawlState::new(known, bans),
            crawler,
            popularity,
        })
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// 按配置选定的分类和排序方式遍历
    pub async fn run_configured(&mut self) -> Result<CrawlStats, CrawlError> {
        let categories = self
            .crawler
            .selected_categories()
            .map_err(CrawlError::Config)?;
        let sorts = self.crawler.selected_sorts().map_err(CrawlError::Config)?;
        Ok(self.run_all(&categories, &sorts).await)
    }

    /// 外层分类、内层排序，严格按给定顺序逐个遍历
    pub async fn run_all(&mut self, categories: &[Category], sorts: &[SortMode]) -> CrawlStats {
        let mut total = CrawlStats::default();
        for &category in categories {
            for &sort in sorts {
                let stats = self.run(category, sort).await;
                total.merge(&stats);
            }
        }

        info!(
            inserted = total.inserted,
            popularity_updates = total.popularity_updates,
            skipped = total.skipped(),
            details_failed = total.details_failed,
            write_failures = total.write_failures,
            known = self.state.known_count(),
            "Crawl finished"
        );
        total
    }

    /// 遍历单个（分类，排序）组合
    #[instrument(skip_all, fields(category = %category, sort = %sort))]
    pub async fn run(&mut self, category: Category, sort: SortMode) -> CrawlStats {
        let mut run = CrawlRun {
            category,
            sort,
            scorer: PopularityScorer::new(self.popularity.top_score, self.popularity.decay_factor),
            stats: CrawlStats::default(),
        };
        info!("Starting run");

        for page in 1..=self.crawler.pages_to_fetch {
            let entries = match self.fetcher.fetch_listing(category, sort, page).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(page, "Failed to load listing page: {}", e);
                    run.stats.pages_failed += 1;
                    continue;
                }
            };
            run.stats.pages_fetched += 1;
            debug!(page, entries = entries.len(), "Listing page loaded");

            for entry in &entries {
                self.handle_entry(&mut run, entry).await;
            }
        }

        if let Err(e) = self.repo.recompute_tags().await {
            warn!("Failed to recompute tags: {}", e);
            run.stats.write_failures += 1;
        }

        let stats = run.stats;
        info!(
            pages = stats.pages_fetched,
            pages_failed = stats.pages_failed,
            entries = stats.entries_seen,
            skipped = stats.skipped(),
            duplicates = stats.duplicates,
            details = stats.details_fetched,
            details_failed = stats.details_failed,
            banned_tags = stats.banned_tag_discards,
            inserted = stats.inserted,
            popularity_updates = stats.popularity_updates,
            write_failures = stats.write_failures,
            "Run finished"
        );
        stats.publish(category, sort);
        stats
    }

    /// 过滤器，返回第一个命中的跳过原因
    pub fn skip_reason(&self, entry: &ListingEntry) -> Option<SkipReason> {
        if entry.id.trim().is_empty() {
            return Some(SkipReason::MissingId);
        }

        let required = self.crawler.required_language.to_lowercase();
        let language_ok = entry
            .language
            .as_deref()
            .map(|label| label.to_lowercase().contains(&required))
            .unwrap_or(false);
        if !language_ok {
            return Some(SkipReason::Language);
        }

        if PRE_ORDER.is_match(&entry.raw_text) {
            return Some(SkipReason::PreOrder);
        }
        if NOT_RATED.is_match(&entry.raw_text) {
            return Some(SkipReason::NotRated);
        }
        if self.state.bans().contains_banned_word(&entry.raw_text) {
            return Some(SkipReason::BannedWord);
        }
        None
    }

    async fn handle_entry(&mut self, run: &mut CrawlRun, entry: &ListingEntry) {
        run.stats.entries_seen += 1;

        if let Some(reason) = self.skip_reason(entry) {
            if reason == SkipReason::MissingId {
                warn!(title = %entry.title, "Skipping listing entry without id");
            } else {
                debug!(asin = %entry.id, title = %entry.title, %reason, "Skipping listing entry");
            }
            run.stats.record_skip(reason);
            return;
        }

        let id = entry.id.trim();

        for tag in run.category.tags() {
            if let Err(e) = self.repo.insert_tag_association(id, tag).await {
                warn!(asin = id, tag, "Failed to record tag association: {}", e);
                run.stats.write_failures += 1;
            }
        }

        if self.state.is_known(id) {
            run.stats.duplicates += 1;
            if run.sort.is_rank_sensitive() {
                let delta = run.scorer.next(run.sort);
                self.add_popularity(run, id, delta).await;
            }
            return;
        }

        match self.fetcher.fetch_detail(id).await {
            Ok(detail) => {
                run.stats.details_fetched += 1;
                self.process_detail(run, id, detail).await;
            }
            Err(e) => {
                warn!(asin = id, "Failed to load detail page: {}", e);
                run.stats.details_failed += 1;
                // The entry still held this listing position
                run.scorer.next(run.sort);
            }
        }
    }

    async fn process_detail(&mut self, run: &mut CrawlRun, listing_id: &str, detail: BookDetail) {
        if let Some(tag) = self.state.bans().first_banned_tag(detail.tags.as_slice()) {
            info!(asin = listing_id, tag, title = %detail.title, "Discarding book with banned tag");
            run.stats.banned_tag_discards += 1;
            return;
        }

        // Listing id is the dedup key and the stored key
        let id = listing_id.to_string();
        let detail_id = detail.id.trim();
        if !detail_id.is_empty() && detail_id != id {
            warn!(asin = %id, detail_id, "Detail page reports a different id, keeping listing id");
        }

        let ratings_overall = score_histogram(&id, "overall", &detail.ratings_overall);
        let ratings_performance = score_histogram(&id, "performance", &detail.ratings_performance);
        let ratings_story = score_histogram(&id, "story", &detail.ratings_story);
        let structured_data = detail.structured_data.clone();

        let mut book = Book::from_detail(&id, detail, &self.crawler.base_book_url);
        book.rating = ratings_overall;
        book.rating_performance = ratings_performance;
        book.rating_story = ratings_story;
        apply_structured_data(&mut book, structured_data.as_deref());

        book.popularity = run.scorer.next(run.sort);
        self.state.mark_known(&id);

        self.upsert(run, &book).await;
    }

    async fn upsert(&self, run: &mut CrawlRun, book: &Book) {
        match self.repo.exists(&book.id).await {
            Ok(false) => match self.repo.insert(book).await {
                Ok(()) => {
                    run.stats.inserted += 1;
                    info!(asin = %book.id, title = %book.title, popularity = book.popularity, "Stored new book");
                }
                Err(e) => self.recover_failed_insert(run, book, e).await,
            },
            Ok(true) => {
                if run.sort.is_rank_sensitive() {
                    self.add_popularity(run, &book.id, book.popularity).await;
                }
            }
            Err(e) => {
                warn!(asin = %book.id, "Failed to check for existing book: {}", e);
                run.stats.write_failures += 1;
            }
        }
    }

    /// 插入失败后重新检查：行已存在说明输给了并发插入，走热度更新；否则记为写入失败
    async fn recover_failed_insert(&self, run: &mut CrawlRun, book: &Book, error: RepositoryError) {
        match self.repo.exists(&book.id).await {
            Ok(true) => {
                debug!(asin = %book.id, "Lost insert race: {}", error);
                if run.sort.is_rank_sensitive() {
                    self.add_popularity(run, &book.id, book.popularity).await;
                }
            }
            Ok(false) => {
                warn!(asin = %book.id, title = %book.title, "Failed to store book: {}", error);
                run.stats.write_failures += 1;
            }
            Err(e) => {
                warn!(asin = %book.id, "Failed to store book: {}; existence recheck failed: {}", error, e);
                run.stats.write_failures += 1;
            }
        }
    }

    async fn add_popularity(&self, run: &mut CrawlRun, id: &str, delta: f64) {
        match self.repo.update_popularity(id, delta).await {
            Ok(()) => {
                run.stats.popularity_updates += 1;
                debug!(asin = id, delta, "Popularity updated");
            }
            Err(e) => {
                warn!(asin = id, delta, "Failed to update popularity: {}", e);
                run.stats.write_failures += 1;
            }
        }
    }
}

/// 解析并打分单个维度的评分直方图
///
/// 空直方图表示页面没有该维度的数据，保持 0；格式错误时记录警告并保持 0。
fn score_histogram(id: &str, dimension: &str, raw: &[String]) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }
    match parse_histogram(raw) {
        Ok(counts) => star_score(&counts),
        Err(e) => {
            warn!(asin = id, dimension, "Ignoring rating histogram: {}", e);
            0.0
        }
    }
}

fn apply_structured_data(book: &mut Book, raw: Option<&str>) {
    let Some(raw) = raw else {
        warn!(asin = %book.id, "Detail page has no structured data");
        return;
    };

    let data = match StructuredData::parse(raw) {
        Ok(data) => data,
        Err(e) => {
            warn!(asin = %book.id, "Failed to parse structured data: {}", e);
            return;
        }
    };

    match data.release_date() {
        Ok(date) => book.release_date = Some(date),
        Err(e) => warn!(asin = %book.id, "No usable release date: {}", e),
    }
    match data.duration_in_minutes() {
        Ok(minutes) => book.duration_in_minutes = minutes,
        Err(e) => warn!(asin = %book.id, "No usable duration: {}", e),
    }
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
