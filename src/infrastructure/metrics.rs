// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 启动 Prometheus 指标导出器
///
/// 未启用或监听地址无效时只记录日志，不影响爬取。
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        return;
    }

    let addr: SocketAddr = match settings.listen_address.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(
                address = %settings.listen_address,
                "Invalid metrics address: {}", e
            );
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
}

fn describe_metrics() {
    describe_counter!("laudrs_runs_total", "Total number of (category, sort) runs completed");
    describe_counter!(
        "laudrs_listing_pages_total",
        "Total number of listing pages requested"
    );
    describe_counter!(
        "laudrs_listing_page_failures_total",
        "Total number of listing pages that failed to load"
    );
    describe_counter!(
        "laudrs_items_skipped_total",
        "Total number of listing items rejected by a filter"
    );
    describe_counter!(
        "laudrs_books_inserted_total",
        "Total number of new book records stored"
    );
    describe_counter!(
        "laudrs_popularity_updates_total",
        "Total number of popularity increments applied"
    );
    describe_counter!(
        "laudrs_detail_failures_total",
        "Total number of detail pages that failed to load or parse"
    );
    describe_counter!(
        "laudrs_write_failures_total",
        "Total number of store writes that were dropped"
    );
}
