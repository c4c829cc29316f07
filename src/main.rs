use anyhow::Result;
use std::sync::Arc;

use car_deals_bot::core::logging::init_logging;
use car_deals_bot::core::{Config, HealthChecker, PipelineMetrics};
use car_deals_bot::pipeline::Orchestrator;
use car_deals_bot::scanner::{sources, Aggregator};
use car_deals_bot::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config.server.log_level);

    tracing::info!("🚗 Car Deals Bot starting...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let metrics = PipelineMetrics::new()?;

    let aggregator = Aggregator::new(
        sources::default_sources(),
        config.pipeline.source_timeout(),
        config.pipeline.default_query.clone(),
    )
    .with_metrics(metrics.clone());
    tracing::info!("Sources: {}", aggregator.source_names().join(", "));

    let orchestrator = Arc::new(Orchestrator::from_config(
        &config,
        Arc::new(aggregator),
        metrics.clone(),
    )?);

    let state = Arc::new(AppState {
        orchestrator: orchestrator.clone(),
        health: HealthChecker::new(orchestrator.is_channel_configured()),
        metrics,
    });

    if config.pipeline.schedule_interval_secs > 0 {
        start_scheduler(
            state.clone(),
            config.pipeline.schedule_interval_secs,
            config.pipeline.cron_secret.clone(),
        );
    }

    tracing::info!("✅ Listening on port {}", config.server.port);
    warp::serve(server::routes(state))
        .run(([0, 0, 0, 0], config.server.port))
        .await;

    Ok(())
}

fn start_scheduler(state: Arc<AppState>, interval_secs: u64, secret: Option<String>) {
    tracing::info!("⏰ Scheduled runs every {}s", interval_secs);

    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));
        // The first tick fires immediately; wait a full period before posting.
        interval.tick().await;

        loop {
            interval.tick().await;

            match state.orchestrator.run_scheduled(secret.as_deref()).await {
                Ok(result) => {
                    tracing::info!(
                        "Scheduled run {}: {} found, {} sent",
                        result.run_id,
                        result.listings_found,
                        result.listings_sent
                    );
                    state.health.record_run(&result).await;
                }
                Err(e) => {
                    tracing::error!("❌ Scheduled run failed: {}", e);
                }
            }
        }
    });
}
