// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static HOURS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)H").unwrap());
static MINUTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)M").unwrap());

/// 内嵌数据解析错误
#[derive(Error, Debug, PartialEq)]
pub enum PayloadError {
    #[error("invalid structured data: {0}")]
    InvalidJson(String),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
}

/// 详情页内嵌的 JSON-LD 数据
///
/// 页面通常给出一个对象数组，字段按出现顺序取第一个命中的对象。
#[derive(Debug)]
pub struct StructuredData {
    objects: Vec<Value>,
}

impl StructuredData {
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_str(raw.trim())
            .map_err(|e| PayloadError::InvalidJson(e.to_string()))?;

        let objects = match value {
            Value::Array(items) => items.into_iter().filter(Value::is_object).collect(),
            obj @ Value::Object(_) => vec![obj],
            _ => Vec::new(),
        };

        if objects.is_empty() {
            return Err(PayloadError::InvalidJson("no objects in payload".to_string()));
        }

        Ok(Self { objects })
    }

    fn field(&self, name: &'static str) -> Result<&str, PayloadError> {
        self.objects
            .iter()
            .find_map(|obj| obj.get(name).and_then(Value::as_str))
            .ok_or(PayloadError::MissingField(name))
    }

    /// `datePublished`，格式固定为 `YYYY-MM-DD`
    pub fn release_date(&self) -> Result<NaiveDate, PayloadError> {
        let raw = self.field("datePublished")?;
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| PayloadError::InvalidDate(raw.to_string()))
    }

    /// `duration` 换算为分钟
    pub fn duration_in_minutes(&self) -> Result<i32, PayloadError> {
        parse_duration(self.field("duration")?)
    }
}

/// 解析 `<N>H<N>M` 形式的时长，两部分均可缺省，但至少要有一部分
pub fn parse_duration(raw: &str) -> Result<i32, PayloadError> {
    let component = |re: &Regex| -> Result<Option<i32>, PayloadError> {
        match re.captures(raw) {
            Some(caps) => caps[1]
                .parse::<i32>()
                .map(Some)
                .map_err(|_| PayloadError::InvalidDuration(raw.to_string())),
            None => Ok(None),
        }
    };

    let hours = component(&HOURS)?;
    let minutes = component(&MINUTES)?;
    if hours.is_none() && minutes.is_none() {
        return Err(PayloadError::InvalidDuration(raw.to_string()));
    }

    hours
        .unwrap_or(0)
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes.unwrap_or(0)))
        .ok_or_else(|| PayloadError::InvalidDuration(raw.to_string()))
}
