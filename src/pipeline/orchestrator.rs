use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::guard::TriggerGuard;
use super::run::{RunResult, Trigger};
use super::PipelineError;
use crate::api::TelegramClient;
use crate::core::{Config, ConfigError, PipelineConfig, PipelineMetrics};
use crate::messaging::{format_greeting, format_header, Publisher};
use crate::scanner::Aggregator;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelCheck {
    pub connected: bool,
    pub message_sent: bool,
    pub channel_id: String,
}

/// Wires aggregation to delivery for the manual and scheduled triggers.
///
/// Runs are independent of each other; two overlapping triggers may
/// interleave their messages in the channel.
pub struct Orchestrator {
    aggregator: Arc<Aggregator>,
    publisher: Result<Arc<Publisher>, ConfigError>,
    guard: TriggerGuard,
    header_pause: Duration,
    on_demand_limit: usize,
    scheduled_limit: usize,
    metrics: Option<PipelineMetrics>,
}

impl Orchestrator {
    /// A missing bot token or channel id is kept rather than raised so that
    /// each publishing entry point can report it on its own.
    pub fn new(
        aggregator: Arc<Aggregator>,
        publisher: Result<Publisher, ConfigError>,
        settings: &PipelineConfig,
    ) -> Self {
        Self {
            aggregator,
            publisher: publisher.map(Arc::new),
            guard: TriggerGuard::new(settings.cron_secret.clone()),
            header_pause: settings.header_pause(),
            on_demand_limit: settings.on_demand_limit,
            scheduled_limit: settings.scheduled_limit,
            metrics: None,
        }
    }

    pub fn from_config(
        config: &Config,
        aggregator: Arc<Aggregator>,
        metrics: PipelineMetrics,
    ) -> Result<Self> {
        let publisher = match config.telegram.credentials() {
            Ok(creds) => {
                let client = TelegramClient::new(&config.telegram.api_base, &creds.bot_token)?;
                Ok(Publisher::new(
                    Arc::new(client),
                    creds.channel_id,
                    config.pipeline.message_delay(),
                )
                .with_link_preview(config.telegram.link_preview)
                .with_metrics(metrics.clone()))
            }
            Err(e) => {
                tracing::warn!("⚠️  Publishing disabled: {}", e);
                Err(e)
            }
        };

        Ok(Self::new(aggregator, publisher, &config.pipeline).with_metrics(metrics))
    }

    pub fn with_metrics(mut self, metrics: PipelineMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn is_channel_configured(&self) -> bool {
        self.publisher.is_ok()
    }

    /// Manual trigger: top `on_demand_limit` listings, no header.
    pub async fn run_on_demand(&self) -> Result<RunResult, PipelineError> {
        let publisher = self.publisher()?;
        self.run(publisher, Trigger::Manual, self.on_demand_limit).await
    }

    /// Scheduled trigger: credential check, then header plus top
    /// `scheduled_limit` listings.
    pub async fn run_scheduled(
        &self,
        credential: Option<&str>,
    ) -> Result<RunResult, PipelineError> {
        self.guard.authorize(credential)?;
        let publisher = self.publisher()?;

        tracing::info!("⏰ Starting scheduled car scraping...");
        self.run(publisher, Trigger::Scheduled, self.scheduled_limit).await
    }

    /// Identity check followed by a greeting message.
    pub async fn check_channel(&self) -> Result<ChannelCheck, PipelineError> {
        let publisher = self.publisher()?;

        let connected = publisher.test_connection().await;
        let message_sent = connected && publisher.send_text(&format_greeting()).await;

        Ok(ChannelCheck {
            connected,
            message_sent,
            channel_id: publisher.channel_id().to_string(),
        })
    }

    async fn run(
        &self,
        publisher: &Publisher,
        trigger: Trigger,
        limit: usize,
    ) -> Result<RunResult, PipelineError> {
        let listings = self.aggregator.top_deals(limit).await;

        let result = if listings.is_empty() {
            tracing::info!("📭 No listings found");
            RunResult::nothing_found(trigger)
        } else {
            if trigger == Trigger::Scheduled {
                let header = format_header(listings.len(), &Local::now());
                if !publisher.send_text(&header).await {
                    tracing::warn!("Header message was not delivered, sending listings anyway");
                }
                tokio::time::sleep(self.header_pause).await;
            }

            let sent = publisher.send_batch(&listings).await;
            tracing::info!(
                "✅ Successfully sent {}/{} listings ({})",
                sent,
                listings.len(),
                trigger.as_str()
            );
            RunResult::published(trigger, &listings, sent)
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_run(trigger.as_str(), result.outcome_label());
        }
        Ok(result)
    }

    fn publisher(&self) -> Result<&Publisher, PipelineError> {
        match &self.publisher {
            Ok(publisher) => Ok(publisher.as_ref()),
            Err(e) => {
                tracing::error!("Telegram configuration missing: {}", e);
                Err(PipelineError::Config(e.clone()))
            }
        }
    }
}
