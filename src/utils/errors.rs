// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::book_repository::RepositoryError;
use thiserror::Error;

/// 爬取流程错误类型
///
/// 只有启动阶段的错误会向上传播；单条目和单页的失败在编排器内部记录后跳过。
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("启动加载失败: {0}")]
    Bootstrap(#[from] RepositoryError),

    #[error("配置错误: {0}")]
    Config(String),
}
