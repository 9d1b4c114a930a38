// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 有声书（book）：列表条目、详情页数据以及最终入库的实体
/// - 目录（catalog）：分类与排序方式的封闭集合及其静态查找表
pub mod book;
pub mod catalog;
