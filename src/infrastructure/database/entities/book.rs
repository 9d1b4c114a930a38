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

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub asin: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub author_link: String,
    pub series: String,
    pub series_link: String,
    pub format: String,
    pub release_date: Option<Date>,
    pub image: String,
    pub sample: String,
    pub link: String,
    #[sea_orm(column_type = "Text")]
    pub summary: String,
    pub copyright: String,
    pub tags: Json,
    pub rating: f64,
    pub rating_performance: f64,
    pub rating_story: f64,
    pub duration_in_minutes: i32,
    pub popularity: f64,
    pub created_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
