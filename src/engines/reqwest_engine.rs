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

use crate::config::settings::CrawlerSettings;
use crate::engines::traits::{EngineError, ScrapeRequest, ScrapeResponse, ScraperEngine};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// 抓取引擎
///
/// 基于reqwest实现的基本HTTP抓取引擎。整个进程共用一个客户端，
/// 请求之间按配置的速率节流；不做重试。
pub struct ReqwestEngine {
    client: reqwest::Client,
    limiter: Option<DefaultDirectRateLimiter>,
    allowed_host: Option<String>,
}

impl ReqwestEngine {
    /// 创建新的引擎实例
    ///
    /// # 参数
    ///
    /// * `settings` - 爬虫配置（用户代理、超时、速率、允许的主机）
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestEngine)` - 引擎实例
    /// * `Err(EngineError)` - HTTP客户端构建失败
    pub fn new(settings: &CrawlerSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .cookie_store(true)
            .build()?;

        let limiter = NonZeroU32::new(settings.requests_per_second)
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Ok(Self {
            client,
            limiter,
            allowed_host: settings.allowed_host.clone(),
        })
    }

    fn check_host(&self, url: &str) -> Result<(), EngineError> {
        let Some(allowed) = &self.allowed_host else {
            return Ok(());
        };

        let parsed = Url::parse(url).map_err(|e| EngineError::Other(format!("Invalid URL: {}", e)))?;
        match parsed.host_str() {
            Some(host) if host.eq_ignore_ascii_case(allowed) => Ok(()),
            other => Err(EngineError::Other(format!(
                "Host {} is not allowed",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

#[async_trait]
impl ScraperEngine for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// 非 2xx 状态码视为失败。
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, EngineError> {
        self.check_host(&request.url)?;

        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let start = Instant::now();
        let response = self.client.get(&request.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status(status.as_u16()));
        }

        let content = response.text().await?;
        let elapsed = start.elapsed().as_millis() as u64;
        debug!(url = %request.url, elapsed_ms = elapsed, "Fetched page");

        Ok(ScrapeResponse {
            status_code: status.as_u16(),
            content,
            response_time_ms: elapsed,
        })
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
