// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::book::Book;
use async_trait::async_trait;
use sea_orm::DbErr;
use std::collections::HashSet;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 有声书仓库特质
///
/// 定义爬取流程所需的全部持久化操作。该特质遵循依赖倒置原则，
/// 编排器只依赖这里的抽象，具体实现由基础设施层提供。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 检查记录是否存在
    async fn exists(&self, id: &str) -> Result<bool, RepositoryError>;

    /// 插入完整记录
    async fn insert(&self, book: &Book) -> Result<(), RepositoryError>;

    /// 累加热度分数
    ///
    /// # 参数
    ///
    /// * `id` - ASIN
    /// * `delta` - 本次列表位置贡献的热度
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 更新成功
    /// * `Err(RepositoryError::NotFound)` - 记录不存在
    async fn update_popularity(&self, id: &str, delta: f64) -> Result<(), RepositoryError>;

    /// 记录一条（书，标签）关联，重复写入视为成功
    async fn insert_tag_association(&self, id: &str, tag: &str) -> Result<(), RepositoryError>;

    /// 将标签关联合并回每本书的标签列表
    async fn recompute_tags(&self) -> Result<(), RepositoryError>;

    /// 加载全部已入库的ID
    async fn load_known_ids(&self) -> Result<HashSet<String>, RepositoryError>;

    /// 加载屏蔽标签
    async fn load_banned_tags(&self) -> Result<HashSet<String>, RepositoryError>;

    /// 加载屏蔽词
    async fn load_banned_words(&self) -> Result<HashSet<String>, RepositoryError>;
}
