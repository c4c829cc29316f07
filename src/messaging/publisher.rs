use std::sync::Arc;
use std::time::Duration;

use super::formatter::format_listing;
use crate::api::{ChannelApi, ParseMode, SendMessageRequest};
use crate::core::PipelineMetrics;
use crate::scanner::Listing;

/// Delivers messages to one channel.
///
/// Every send reports a plain `bool`: a failed delivery is logged and
/// counted, never raised. Batches are strictly sequential with a pause after
/// each delivered item so the channel's flood limits are respected.
pub struct Publisher {
    api: Arc<dyn ChannelApi>,
    channel_id: String,
    message_delay: Duration,
    link_preview: bool,
    metrics: Option<PipelineMetrics>,
}

impl Publisher {
    pub fn new(
        api: Arc<dyn ChannelApi>,
        channel_id: impl Into<String>,
        message_delay: Duration,
    ) -> Self {
        Self {
            api,
            channel_id: channel_id.into(),
            message_delay,
            link_preview: true,
            metrics: None,
        }
    }

    pub fn with_link_preview(mut self, enabled: bool) -> Self {
        self.link_preview = enabled;
        self
    }

    pub fn with_metrics(mut self, metrics: PipelineMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// `text` must already be valid MarkdownV2.
    pub async fn send_text(&self, text: &str) -> bool {
        let request = SendMessageRequest {
            chat_id: self.channel_id.clone(),
            text: text.to_string(),
            parse_mode: Some(ParseMode::MarkdownV2),
            disable_web_page_preview: !self.link_preview,
        };

        let delivered = match self.api.send_message(request).await {
            Ok(message) => {
                tracing::debug!(
                    "✉️  Delivered message {} to {}",
                    message.message_id,
                    self.channel_id
                );
                true
            }
            Err(e) => {
                tracing::error!("Error sending message to Telegram: {}", e);
                false
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_message(delivered);
        }
        delivered
    }

    pub async fn send_listing(&self, listing: &Listing) -> bool {
        self.send_text(&format_listing(listing)).await
    }

    /// Sends each listing in order and returns how many were delivered.
    ///
    /// A failure skips straight to the next item; a success is followed by
    /// the inter-message delay unless it was the last item. No retries.
    pub async fn send_batch(&self, listings: &[Listing]) -> usize {
        let mut sent = 0;

        for (i, listing) in listings.iter().enumerate() {
            if self.send_listing(listing).await {
                sent += 1;
                if i + 1 < listings.len() {
                    tokio::time::sleep(self.message_delay).await;
                }
            } else {
                tracing::warn!(
                    "⏭️  Skipping listing {}/{}: {}",
                    i + 1,
                    listings.len(),
                    listing.url
                );
            }
        }

        sent
    }

    /// Identity check against the Bot API. Configuration validation only.
    pub async fn test_connection(&self) -> bool {
        match self.api.get_me().await {
            Ok(bot) => {
                tracing::info!(
                    "🤖 Connected as {}",
                    bot.username.as_deref().unwrap_or(&bot.first_name)
                );
                true
            }
            Err(e) => {
                tracing::warn!("Error testing Telegram connection: {}", e);
                false
            }
        }
    }
}
