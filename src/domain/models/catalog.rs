// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 可爬取的商品分类
///
/// 变体的声明顺序即遍历顺序，同时也是 `CATEGORY_TABLE` 的下标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    SciFiFantasy,
    Fantasy,
    SciFi,
    YaSciFiFantasy,
    KidsSciFiFantasy,
    FantasyEpic,
    FantasyAdventure,
    FantasyCreatures,
    FantasyHumour,
    SciFiHard,
    SciFiHumour,
    SciFiSpaceExploration,
    SciFiSpaceOpera,
}

/// 分类的静态描述
#[derive(Debug)]
pub struct CategoryInfo {
    pub category: Category,
    /// 站点上的分类节点ID
    pub node: &'static str,
    /// 配置文件中使用的短名称
    pub slug: &'static str,
    pub display_name: &'static str,
    /// 站点不直接展示、需要回填的描述性标签
    pub tags: &'static [&'static str],
}

/// 分类查找表
pub static CATEGORY_TABLE: [CategoryInfo; 13] = [
    CategoryInfo {
        category: Category::SciFiFantasy,
        node: "19378442031",
        slug: "scifi-fantasy",
        display_name: "SciFi Fantasy",
        tags: &["Science Fiction", "Fantasy"],
    },
    CategoryInfo {
        category: Category::Fantasy,
        node: "19378443031",
        slug: "fantasy",
        display_name: "Fantasy",
        tags: &["Fantasy"],
    },
    CategoryInfo {
        category: Category::SciFi,
        node: "19378464031",
        slug: "scifi",
        display_name: "SciFi",
        tags: &["Science Fiction"],
    },
    CategoryInfo {
        category: Category::YaSciFiFantasy,
        node: "19377879031",
        slug: "ya-scifi-fantasy",
        display_name: "YA SciFi Fantasy",
        tags: &["Young Adult", "Science Fiction", "Fantasy"],
    },
    CategoryInfo {
        category: Category::KidsSciFiFantasy,
        node: "19377132031",
        slug: "kids-scifi-fantasy",
        display_name: "Children's SciFi Fantasy",
        tags: &["Children's", "Science Fiction", "Fantasy"],
    },
    CategoryInfo {
        category: Category::FantasyEpic,
        node: "19378451031",
        slug: "fantasy-epic",
        display_name: "Fantasy Epic",
        tags: &["Fantasy", "Epic"],
    },
    CategoryInfo {
        category: Category::FantasyAdventure,
        node: "19378444031",
        slug: "fantasy-adventure",
        display_name: "Fantasy Adventure",
        tags: &["Fantasy", "Adventure"],
    },
    CategoryInfo {
        category: Category::FantasyCreatures,
        node: "19378449031",
        slug: "fantasy-creatures",
        display_name: "Fantasy Creatures",
        tags: &["Fantasy", "Creatures"],
    },
    CategoryInfo {
        category: Category::FantasyHumour,
        node: "19378455031",
        slug: "fantasy-humour",
        display_name: "Fantasy Humour",
        tags: &["Fantasy", "Humour"],
    },
    CategoryInfo {
        category: Category::SciFiHard,
        node: "19378474031",
        slug: "scifi-hard",
        display_name: "SciFi Hard",
        tags: &["Science Fiction", "Hard Science Fiction"],
    },
    CategoryInfo {
        category: Category::SciFiHumour,
        node: "19378475031",
        slug: "scifi-humour",
        display_name: "SciFi Humour",
        tags: &["Science Fiction", "Humour"],
    },
    CategoryInfo {
        category: Category::SciFiSpaceExploration,
        node: "19378479031",
        slug: "scifi-space-exploration",
        display_name: "SciFi Space Exploration",
        tags: &["Science Fiction", "Space Exploration"],
    },
    CategoryInfo {
        category: Category::SciFiSpaceOpera,
        node: "19378480031",
        slug: "scifi-space-opera",
        display_name: "SciFi Space Opera",
        tags: &["Science Fiction", "Space Opera"],
    },
];

impl Category {
    /// 按遍历顺序排列的全部分类
    pub fn all() -> impl Iterator<Item = Category> {
        CATEGORY_TABLE.iter().map(|info| info.category)
    }

    pub fn info(self) -> &'static CategoryInfo {
        &CATEGORY_TABLE[self as usize]
    }

    pub fn node(self) -> &'static str {
        self.info().node
    }

    pub fn slug(self) -> &'static str {
        self.info().slug
    }

    pub fn display_name(self) -> &'static str {
        self.info().display_name
    }

    pub fn tags(self) -> &'static [&'static str] {
        self.info().tags
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATEGORY_TABLE
            .iter()
            .find(|info| info.slug.eq_ignore_ascii_case(s.trim()))
            .map(|info| info.category)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// 列表排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    Featured,
    Popularity,
    ReviewScore,
}

impl SortMode {
    /// 按遍历顺序排列的全部排序方式
    pub const ALL: [SortMode; 3] = [SortMode::Featured, SortMode::Popularity, SortMode::ReviewScore];

    /// 搜索URL中的 `sort` 参数值
    pub fn param(self) -> &'static str {
        match self {
            SortMode::Featured => "",
            SortMode::Popularity => "popularity-rank",
            SortMode::ReviewScore => "review-rank",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            SortMode::Featured => "featured",
            SortMode::Popularity => "popularity",
            SortMode::ReviewScore => "review",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SortMode::Featured => "Featured",
            SortMode::Popularity => "Popularity",
            SortMode::ReviewScore => "Review Score",
        }
    }

    /// 列表位置是否反映热度排名
    pub fn is_rank_sensitive(self) -> bool {
        matches!(self, SortMode::Popularity)
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|sort| sort.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sort mode: {}", s))
    }
}

/// 构建列表页搜索URL
///
/// `page` 为 0 时不附带分页参数。
pub fn search_url(
    base_search_url: &str,
    category: Category,
    sort: SortMode,
    page_size: u32,
    page: u32,
) -> String {
    let mut url = format!(
        "{}&category={}&sort={}",
        base_search_url,
        category.node(),
        sort.param()
    );
    if page > 0 {
        url.push_str(&format!("&pageSize={}&page={}", page_size, page));
    }
    url
}

/// 构建详情页URL
pub fn detail_url(base_book_url: &str, id: &str) -> String {
    format!("{}{}", base_book_url, id)
}
