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

use crate::domain::models::book::Book;
use crate::domain::repositories::book_repository::{BookRepository, RepositoryError};
use crate::infrastructure::database::entities::{banned_tag, banned_word, book, book_tag};
use async_trait::async_trait;
use sea_orm::{sea_query::Expr, sea_query::OnConflict, *};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use tracing::debug;

/// 有声书仓库实现
pub struct BookRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl BookRepositoryImpl {
    /// 创建新的有声书仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的有声书仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn tags_to_json(tags: &BTreeSet<String>) -> serde_json::Value {
    serde_json::Value::Array(
        tags.iter()
            .map(|t| serde_json::Value::String(t.clone()))
            .collect(),
    )
}

fn tags_from_json(value: &serde_json::Value) -> BTreeSet<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl BookRepository for BookRepositoryImpl {
    async fn exists(&self, id: &str) -> Result<bool, RepositoryError> {
        let count = book::Entity::find()
            .filter(book::Column::Asin.eq(id))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn insert(&self, b: &Book) -> Result<(), RepositoryError> {
        let tags: BTreeSet<String> = b.tags.iter().cloned().collect();
        let model = book::ActiveModel {
            asin: Set(b.id.clone()),
            title: Set(b.title.clone()),
            subtitle: Set(b.subtitle.clone()),
            author: Set(b.author.clone()),
            author_link: Set(b.author_link.clone()),
            series: Set(b.series.clone()),
            series_link: Set(b.series_link.clone()),
            format: Set(b.format.clone()),
            release_date: Set(b.release_date),
            image: Set(b.image.clone()),
            sample: Set(b.sample.clone()),
            link: Set(b.link.clone()),
            summary: Set(b.summary.clone()),
            copyright: Set(b.copyright.clone()),
            tags: Set(tags_to_json(&tags)),
            rating: Set(b.rating),
            rating_performance: Set(b.rating_performance),
            rating_story: Set(b.rating_story),
            duration_in_minutes: Set(b.duration_in_minutes),
            popularity: Set(b.popularity),
            created_at: Set(chrono::Utc::now().into()),
        };

        book::Entity::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn update_popularity(&self, id: &str, delta: f64) -> Result<(), RepositoryError> {
        let result = book::Entity::update_many()
            .col_expr(
                book::Column::Popularity,
                Expr::col(book::Column::Popularity).add(delta),
            )
            .filter(book::Column::Asin.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn insert_tag_association(&self, id: &str, tag: &str) -> Result<(), RepositoryError> {
        let model = book_tag::ActiveModel {
            asin: Set(id.to_string()),
            tag: Set(tag.to_string()),
        };

        book_tag::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([book_tag::Column::Asin, book_tag::Column::Tag])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn recompute_tags(&self) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let mut associations: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for row in book_tag::Entity::find().all(&txn).await? {
            associations.entry(row.asin).or_default().insert(row.tag);
        }

        let mut updated = 0usize;
        for (asin, extra) in associations {
            // Associations may exist for books that were filtered out later
            let Some(model) = book::Entity::find_by_id(asin).one(&txn).await? else {
                continue;
            };

            let mut tags = tags_from_json(&model.tags);
            let before = tags.len();
            tags.extend(extra);
            if tags.len() == before {
                continue;
            }

            let mut active: book::ActiveModel = model.into();
            active.tags = Set(tags_to_json(&tags));
            active.update(&txn).await?;
            updated += 1;
        }

        txn.commit().await?;
        debug!(updated, "Recomputed aggregate tags");
        Ok(())
    }

    async fn load_known_ids(&self) -> Result<HashSet<String>, RepositoryError> {
        let ids: Vec<String> = book::Entity::find()
            .select_only()
            .column(book::Column::Asin)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn load_banned_tags(&self) -> Result<HashSet<String>, RepositoryError> {
        let rows = banned_tag::Entity::find().all(self.db.as_ref()).await?;
        Ok(rows.into_iter().map(|r| r.tag).collect())
    }

    async fn load_banned_words(&self) -> Result<HashSet<String>, RepositoryError> {
        let rows = banned_word::Entity::find().all(self.db.as_ref()).await?;
        Ok(rows.into_iter().map(|r| r.word).collect())
    }
}
