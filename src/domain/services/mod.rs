// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务，这些服务封装了复杂的
/// 业务规则和领域逻辑，协调多个领域对象来完成业务操作。
///
/// 包含的服务：
/// - 爬取服务（crawl_service）：遍历分类与排序矩阵，编排过滤、去重和入库
/// - 爬取状态（crawl_state）：已见ID集合与屏蔽列表
/// - 提取服务（extraction_service）：从列表页和详情页提取结构化数据
/// - 热度打分（popularity_scorer）：按列表位置衰减的热度分数
/// - 评分打分（star_scorer）：五星直方图的 Wilson 下界
/// - 结构化数据（structured_data）：解析详情页内嵌的 JSON-LD
pub mod crawl_service;
pub mod crawl_state;
pub mod extraction_service;
pub mod popularity_scorer;
pub mod star_scorer;
pub mod structured_data;
