// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::migrated_sqlite;
use laudrs::domain::models::book::Book;
use laudrs::domain::repositories::book_repository::{BookRepository, RepositoryError};
use laudrs::infrastructure::database::entities::{banned_tag, banned_word, book};
use laudrs::infrastructure::repositories::book_repo_impl::BookRepositoryImpl;
use sea_orm::{EntityTrait, Set};

fn sample_book(id: &str) -> Book {
    Book {
        id: id.to_string(),
        title: format!("Book {}", id),
        format: "Unabridged Audiobook".to_string(),
        release_date: chrono::NaiveDate::from_ymd_opt(2020, 5, 17),
        summary: "<p>Long summary</p>".to_string(),
        tags: vec!["Space Opera".to_string(), "Epic".to_string()],
        rating: 4.5,
        duration_in_minutes: 600,
        popularity: 500.0,
        ..Default::default()
    }
}

/// 插入后可查询到，字段原样保存
#[tokio::test]
async fn test_insert_and_exists() {
    let db = migrated_sqlite().await;
    let repo = BookRepositoryImpl::new(db.clone());

    assert!(!repo.exists("B1").await.unwrap());
    repo.insert(&sample_book("B1")).await.unwrap();
    assert!(repo.exists("B1").await.unwrap());

    let stored = book::Entity::find_by_id("B1".to_string())
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Book B1");
    assert_eq!(stored.release_date, chrono::NaiveDate::from_ymd_opt(2020, 5, 17));
    assert_eq!(stored.duration_in_minutes, 600);
    assert_eq!(stored.popularity, 500.0);
    assert_eq!(stored.tags, serde_json::json!(["Epic", "Space Opera"]));
}

/// 重复插入返回数据库错误
#[tokio::test]
async fn test_duplicate_insert_fails() {
    let db = migrated_sqlite().await;
    let repo = BookRepositoryImpl::new(db);

    repo.insert(&sample_book("B1")).await.unwrap();
    let result = repo.insert(&sample_book("B1")).await;

    assert!(matches!(result, Err(RepositoryError::Database(_))));
}

/// 热度累加；记录不存在时返回 NotFound
#[tokio::test]
async fn test_update_popularity_accumulates() {
    let db = migrated_sqlite().await;
    let repo = BookRepositoryImpl::new(db.clone());

    repo.insert(&sample_book("B1")).await.unwrap();
    repo.update_popularity("B1", 12.5).await.unwrap();
    repo.update_popularity("B1", 7.5).await.unwrap();

    let stored = book::Entity::find_by_id("B1".to_string())
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert!((stored.popularity - 520.0).abs() < 1e-9);

    let missing = repo.update_popularity("NOPE", 1.0).await;
    assert!(matches!(missing, Err(RepositoryError::NotFound)));
}

/// 标签关联幂等，汇总后每本书的标签为去重排序后的并集
#[tokio::test]
async fn test_tag_associations_and_recompute() {
    let db = migrated_sqlite().await;
    let repo = BookRepositoryImpl::new(db.clone());

    repo.insert(&sample_book("B1")).await.unwrap();
    repo.insert_tag_association("B1", "Fantasy").await.unwrap();
    repo.insert_tag_association("B1", "Fantasy").await.unwrap();
    repo.insert_tag_association("B1", "Epic").await.unwrap();
    // Association for a book that was never stored
    repo.insert_tag_association("GHOST", "Fantasy").await.unwrap();

    repo.recompute_tags().await.unwrap();

    let stored = book::Entity::find_by_id("B1".to_string())
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.tags,
        serde_json::json!(["Epic", "Fantasy", "Space Opera"])
    );
    assert!(!repo.exists("GHOST").await.unwrap());
}

/// 启动加载：已知ID和屏蔽列表
#[tokio::test]
async fn test_load_state() {
    let db = migrated_sqlite().await;
    let repo = BookRepositoryImpl::new(db.clone());

    repo.insert(&sample_book("B1")).await.unwrap();
    repo.insert(&sample_book("B2")).await.unwrap();

    banned_tag::Entity::insert(banned_tag::ActiveModel {
        tag: Set("Erotica".to_string()),
    })
    .exec_without_returning(db.as_ref())
    .await
    .unwrap();
    banned_word::Entity::insert(banned_word::ActiveModel {
        word: Set("Romance".to_string()),
    })
    .exec_without_returning(db.as_ref())
    .await
    .unwrap();

    let known = repo.load_known_ids().await.unwrap();
    assert_eq!(known.len(), 2);
    assert!(known.contains("B1") && known.contains("B2"));

    let tags = repo.load_banned_tags().await.unwrap();
    assert!(tags.contains("Erotica"));

    let words = repo.load_banned_words().await.unwrap();
    assert!(words.contains("Romance"));
}
