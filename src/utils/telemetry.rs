// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 日志输出格式环境变量
pub const LOG_FORMAT_ENV: &str = "LAUDRS_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info,laudrs=debug";

/// 是否输出 JSON 日志
pub fn json_requested(value: Option<&str>) -> bool {
    value
        .map(|v| v.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

pub fn init_telemetry() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());
    let format = std::env::var(LOG_FORMAT_ENV).ok();

    let registry = tracing_subscriber::registry().with(filter);
    if json_requested(format.as_deref()) {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
