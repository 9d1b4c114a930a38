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

use laudrs::config::settings::Settings;
use laudrs::domain::services::crawl_service::CrawlService;
use laudrs::engines::catalog_engine::CatalogEngine;
use laudrs::engines::reqwest_engine::ReqwestEngine;
use laudrs::infrastructure::database::connection;
use laudrs::infrastructure::repositories::book_repo_impl::BookRepositoryImpl;
use std::sync::Arc;
use tracing::info;

use laudrs::utils::telemetry;
use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并执行一次完整的目录遍历
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting laudrs...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    laudrs::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize Components
    let engine = Arc::new(ReqwestEngine::new(&settings.crawler)?);
    let fetcher = Arc::new(CatalogEngine::new(engine, &settings.crawler));
    let repo = Arc::new(BookRepositoryImpl::new(db.clone()));

    // 5. Load crawl state; the store must be reachable before anything is fetched
    let mut service =
        CrawlService::bootstrap(fetcher, repo, settings.crawler.clone(), settings.popularity)
            .await?;

    // 6. Crawl
    let stats = service.run_configured().await?;
    info!(
        inserted = stats.inserted,
        popularity_updates = stats.popularity_updates,
        "laudrs finished"
    );

    Ok(())
}
