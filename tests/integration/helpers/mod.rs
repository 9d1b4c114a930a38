// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use laudrs::config::settings::{CrawlerSettings, DatabaseSettings};
use laudrs::domain::models::book::{Book, BookDetail, ListingEntry};
use laudrs::domain::models::catalog::{Category, SortMode};
use laudrs::domain::repositories::book_repository::{BookRepository, RepositoryError};
use laudrs::engines::traits::{CatalogFetcher, EngineError};
use laudrs::infrastructure::database::connection;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// 内存版目录抓取器
///
/// 列表页按（分类，排序，页码）预置，未预置的页返回空列表；
/// 详情页按ID预置，未预置的ID返回错误。
#[derive(Default)]
pub struct FakeCatalogFetcher {
    listings: Mutex<HashMap<(Category, SortMode, u32), Result<Vec<ListingEntry>, u16>>>,
    details: Mutex<HashMap<String, BookDetail>>,
    detail_calls: Mutex<Vec<String>>,
    listing_calls: Mutex<Vec<(Category, SortMode, u32)>>,
}

#[allow(dead_code)]
impl FakeCatalogFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(
        self,
        category: Category,
        sort: SortMode,
        page: u32,
        entries: Vec<ListingEntry>,
    ) -> Self {
        self.listings
            .lock()
            .unwrap()
            .insert((category, sort, page), Ok(entries));
        self
    }

    pub fn with_failing_listing(self, category: Category, sort: SortMode, page: u32) -> Self {
        self.listings
            .lock()
            .unwrap()
            .insert((category, sort, page), Err(503));
        self
    }

    pub fn with_detail(self, detail: BookDetail) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(detail.id.clone(), detail);
        self
    }

    /// 以指定ID预置详情页，详情本身的ID可以为空
    pub fn with_detail_as(self, id: &str, detail: BookDetail) -> Self {
        self.details.lock().unwrap().insert(id.to_string(), detail);
        self
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }

    pub fn listing_calls(&self) -> Vec<(Category, SortMode, u32)> {
        self.listing_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogFetcher for FakeCatalogFetcher {
    async fn fetch_listing(
        &self,
        category: Category,
        sort: SortMode,
        page: u32,
    ) -> Result<Vec<ListingEntry>, EngineError> {
        self.listing_calls
            .lock()
            .unwrap()
            .push((category, sort, page));
        match self.listings.lock().unwrap().get(&(category, sort, page)) {
            Some(Ok(entries)) => Ok(entries.clone()),
            Some(Err(status)) => Err(EngineError::Status(*status)),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_detail(&self, id: &str) -> Result<BookDetail, EngineError> {
        self.detail_calls.lock().unwrap().push(id.to_string());
        self.details
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::Status(404))
    }
}

/// 内存版有声书仓库
///
/// 记录每一次写入，便于断言编排器的调用序列。
#[derive(Default)]
pub struct InMemoryBookRepository {
    pub books: Mutex<HashMap<String, Book>>,
    pub inserts: Mutex<Vec<String>>,
    pub popularity_updates: Mutex<Vec<(String, f64)>>,
    pub tag_associations: Mutex<BTreeSet<(String, String)>>,
    pub tag_association_writes: Mutex<usize>,
    pub recompute_calls: Mutex<usize>,
    pub banned_tags: HashSet<String>,
    pub banned_words: HashSet<String>,
    /// 模拟并发插入：启动时不加载、`exists` 返回 false，但 `insert` 失败
    pub racing_ids: HashSet<String>,
    /// 模拟写入故障：`insert` 失败且行不存在
    pub failing_inserts: HashSet<String>,
}

#[allow(dead_code)]
impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_banned_tags(mut self, tags: &[&str]) -> Self {
        self.banned_tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_banned_words(mut self, words: &[&str]) -> Self {
        self.banned_words = words.iter().map(|w| w.to_string()).collect();
        self
    }

    pub fn with_book(self, book: Book) -> Self {
        self.books.lock().unwrap().insert(book.id.clone(), book);
        self
    }

    pub fn with_racing_id(mut self, id: &str) -> Self {
        self.racing_ids.insert(id.to_string());
        self
    }

    pub fn with_failing_insert(mut self, id: &str) -> Self {
        self.failing_inserts.insert(id.to_string());
        self
    }

    pub fn book(&self, id: &str) -> Option<Book> {
        self.books.lock().unwrap().get(id).cloned()
    }

    pub fn inserts(&self) -> Vec<String> {
        self.inserts.lock().unwrap().clone()
    }

    pub fn popularity_updates(&self) -> Vec<(String, f64)> {
        self.popularity_updates.lock().unwrap().clone()
    }

    pub fn tags_for(&self, id: &str) -> Vec<String> {
        self.tag_associations
            .lock()
            .unwrap()
            .iter()
            .filter(|(asin, _)| asin == id)
            .map(|(_, tag)| tag.clone())
            .collect()
    }

    pub fn tag_association_writes(&self) -> usize {
        *self.tag_association_writes.lock().unwrap()
    }

    pub fn recompute_calls(&self) -> usize {
        *self.recompute_calls.lock().unwrap()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn exists(&self, id: &str) -> Result<bool, RepositoryError> {
        if self.racing_ids.contains(id) {
            return Ok(false);
        }
        Ok(self.books.lock().unwrap().contains_key(id))
    }

    async fn insert(&self, book: &Book) -> Result<(), RepositoryError> {
        if self.failing_inserts.contains(&book.id) {
            return Err(RepositoryError::Database(sea_orm::DbErr::Custom(
                "connection reset".to_string(),
            )));
        }
        let mut books = self.books.lock().unwrap();
        if books.contains_key(&book.id) {
            return Err(RepositoryError::Database(sea_orm::DbErr::Custom(
                "UNIQUE constraint failed: books.asin".to_string(),
            )));
        }
        books.insert(book.id.clone(), book.clone());
        self.inserts.lock().unwrap().push(book.id.clone());
        Ok(())
    }

    async fn update_popularity(&self, id: &str, delta: f64) -> Result<(), RepositoryError> {
        let mut books = self.books.lock().unwrap();
        let book = books.get_mut(id).ok_or(RepositoryError::NotFound)?;
        book.popularity += delta;
        self.popularity_updates
            .lock()
            .unwrap()
            .push((id.to_string(), delta));
        Ok(())
    }

    async fn insert_tag_association(&self, id: &str, tag: &str) -> Result<(), RepositoryError> {
        *self.tag_association_writes.lock().unwrap() += 1;
        self.tag_associations
            .lock()
            .unwrap()
            .insert((id.to_string(), tag.to_string()));
        Ok(())
    }

    async fn recompute_tags(&self) -> Result<(), RepositoryError> {
        *self.recompute_calls.lock().unwrap() += 1;
        let associations = self.tag_associations.lock().unwrap().clone();
        let mut books = self.books.lock().unwrap();
        for (asin, tag) in associations {
            if let Some(book) = books.get_mut(&asin) {
                if !book.tags.contains(&tag) {
                    book.tags.push(tag);
                }
                book.tags.sort();
            }
        }
        Ok(())
    }

    async fn load_known_ids(&self) -> Result<HashSet<String>, RepositoryError> {
        Ok(self
            .books
            .lock()
            .unwrap()
            .keys()
            .filter(|id| !self.racing_ids.contains(*id))
            .cloned()
            .collect())
    }

    async fn load_banned_tags(&self) -> Result<HashSet<String>, RepositoryError> {
        Ok(self.banned_tags.clone())
    }

    async fn load_banned_words(&self) -> Result<HashSet<String>, RepositoryError> {
        Ok(self.banned_words.clone())
    }
}

/// 构造一个通过全部过滤器的列表条目
#[allow(dead_code)]
pub fn listing_entry(id: &str) -> ListingEntry {
    ListingEntry {
        id: id.to_string(),
        title: format!("Book {}", id),
        language: Some("Language: English".to_string()),
        raw_text: format!("Book {} Length: 10 hrs Language: English", id),
    }
}

/// 构造一个带完整评分和内嵌数据的详情页
#[allow(dead_code)]
pub fn book_detail(id: &str) -> BookDetail {
    BookDetail {
        id: id.to_string(),
        title: format!("Book {}", id),
        author: "Some Author".to_string(),
        format: "Unabridged\n   Audiobook".to_string(),
        tags: vec!["Epic".to_string()],
        ratings_overall: vec!["100", "20", "5", "1", "0"]
            .into_iter()
            .map(String::from)
            .collect(),
        structured_data: Some(
            r#"[{"@type":"Audiobook","datePublished":"2021-03-04","duration":"PT10H30M"}]"#
                .to_string(),
        ),
        ..Default::default()
    }
}

/// 只抓一页的爬虫配置
#[allow(dead_code)]
pub fn single_page_settings() -> CrawlerSettings {
    CrawlerSettings {
        pages_to_fetch: 1,
        ..Default::default()
    }
}

/// 已执行迁移的内存 SQLite 数据库
#[allow(dead_code)]
pub async fn migrated_sqlite() -> Arc<DatabaseConnection> {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: None,
        min_connections: None,
        connect_timeout: Some(5),
        idle_timeout: None,
    };
    let db = connection::create_pool(&settings).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(db)
}
