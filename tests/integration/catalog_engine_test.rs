// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::migrated_sqlite;
use laudrs::config::settings::{CrawlerSettings, PopularitySettings};
use laudrs::domain::models::catalog::{Category, SortMode};
use laudrs::domain::repositories::book_repository::BookRepository;
use laudrs::domain::services::crawl_service::CrawlService;
use laudrs::engines::catalog_engine::CatalogEngine;
use laudrs::engines::reqwest_engine::ReqwestEngine;
use laudrs::engines::traits::{CatalogFetcher, EngineError};
use laudrs::infrastructure::database::entities::book;
use laudrs::infrastructure::repositories::book_repo_impl::BookRepositoryImpl;
use sea_orm::EntityTrait;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PAGE: &str = r#"
<html><body><ul>
  <li class="productListItem">
    <h3><a href="/pd/B0A">Alpha</a></h3>
    <span class="languageLabel">Language: English</span>
    <div id="sample-player-B0A"><button sample-asin="B0A"></button></div>
  </li>
  <li class="productListItem">
    <h3><a href="/pd/B0B">Beta</a></h3>
    <span class="languageLabel">Language: English</span>
    <span>Pre-order: releases next month</span>
    <div id="sample-player-B0B"><button sample-asin="B0B"></button></div>
  </li>
</ul></body></html>
"#;

const DETAIL_PAGE: &str = r#"
<html><body><div class="adbl-page">
  <h1>Alpha</h1>
  <li class="authorLabel">By: <a href="/author/A">Ann Author</a></li>
  <li class="format">Unabridged
      Audiobook</li>
  <div id="sample-player-B0A"><button sample-asin="B0A" data-mp3="https://cdn/x.mp3"></button></div>
  <div id="center-10"><span class="bc-chip-text">Epic</span></div>
  <div id="center-16"><div class="bc-row-responsive">
    <div><ul>
      <li class="histogram-rating"><span>5</span><span></span><span></span><span></span><span>1,000</span></li>
      <li class="histogram-rating"><span>4</span><span></span><span></span><span></span><span>100</span></li>
      <li class="histogram-rating"><span>3</span><span></span><span></span><span></span><span>10</span></li>
      <li class="histogram-rating"><span>2</span><span></span><span></span><span></span><span>1</span></li>
      <li class="histogram-rating"><span>1</span><span></span><span></span><span></span><span>0</span></li>
    </ul></div>
  </div></div>
  <script type="application/ld+json">{"@type":"Audiobook","datePublished":"2019-11-05","duration":"PT12H5M"}</script>
</div></body></html>
"#;

fn settings_for(server: &MockServer) -> CrawlerSettings {
    CrawlerSettings {
        base_search_url: format!("{}/search?ipRedirectOverride=true", server.uri()),
        base_book_url: format!("{}/pd/", server.uri()),
        allowed_host: None,
        pages_to_fetch: 1,
        requests_per_second: 0,
        request_timeout_secs: 5,
        ..Default::default()
    }
}

fn catalog_engine(settings: &CrawlerSettings) -> CatalogEngine {
    let engine = Arc::new(ReqwestEngine::new(settings).unwrap());
    CatalogEngine::new(engine, settings)
}

async fn mount_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("category", Category::Fantasy.node()))
        .and(query_param("sort", "popularity-rank"))
        .and(query_param("pageSize", "50"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_PAGE))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pd/B0A"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL_PAGE))
        .mount(server)
        .await;
}

/// 列表页URL携带分类、排序和分页参数，条目按页面顺序返回
#[tokio::test]
async fn test_fetch_listing_builds_search_url() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let engine = catalog_engine(&settings_for(&server));

    let entries = engine
        .fetch_listing(Category::Fantasy, SortMode::Popularity, 1)
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "B0A");
    assert_eq!(entries[1].id, "B0B");
    assert!(entries[1].raw_text.contains("Pre-order"));
}

/// 详情页解析
#[tokio::test]
async fn test_fetch_detail() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let engine = catalog_engine(&settings_for(&server));

    let detail = engine.fetch_detail("B0A").await.unwrap();

    assert_eq!(detail.title, "Alpha");
    assert_eq!(detail.author, "Ann Author");
    assert_eq!(detail.ratings_overall, vec!["1,000", "100", "10", "1", "0"]);
    assert_eq!(detail.tags, vec!["Epic"]);
}

/// 非 2xx 的详情页返回状态错误
#[tokio::test]
async fn test_fetch_detail_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pd/GONE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let engine = catalog_engine(&settings_for(&server));

    let result = engine.fetch_detail("GONE").await;

    assert!(matches!(result, Err(EngineError::Status(404))));
}

/// 从 HTTP 到 SQLite 的完整流程
#[tokio::test]
async fn test_crawl_pipeline_against_mock_site() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let settings = settings_for(&server);

    let db = migrated_sqlite().await;
    let repo = Arc::new(BookRepositoryImpl::new(db.clone()));
    let fetcher = Arc::new(catalog_engine(&settings));
    let mut svc = CrawlService::bootstrap(
        fetcher,
        repo.clone(),
        settings,
        PopularitySettings::default(),
    )
    .await
    .unwrap();

    let stats = svc.run(Category::Fantasy, SortMode::Popularity).await;

    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.skipped_pre_order, 1);
    assert!(repo.exists("B0A").await.unwrap());
    assert!(!repo.exists("B0B").await.unwrap());

    let stored = book::Entity::find_by_id("B0A".to_string())
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.format, "Unabridged Audiobook");
    assert_eq!(stored.link, format!("{}/pd/B0A", server.uri()));
    assert_eq!(stored.duration_in_minutes, 725);
    assert_eq!(stored.popularity, 500.0);
    assert!(stored.rating > 4.0);
    assert_eq!(stored.tags, serde_json::json!(["Epic", "Fantasy"]));
}
