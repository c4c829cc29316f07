use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use super::types::*;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Telegram API error {code:?}: {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// The two Bot API calls the publisher relies on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelApi: Send + Sync {
    async fn send_message(&self, request: SendMessageRequest) -> Result<SentMessage, ChannelError>;

    async fn get_me(&self) -> Result<BotUser, ChannelError>;
}

pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, bot_token: &str) -> Result<Self, ChannelError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", api_base.trim_end_matches('/'), bot_token),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: Option<&SendMessageRequest>,
    ) -> Result<T, ChannelError> {
        let url = format!("{}/{}", self.base_url, method);

        let request = match body {
            Some(body) => self.client.post(&url).json(body),
            None => self.client.get(&url),
        };

        let response = request.send().await?;
        let status = response.status();

        // Telegram reports rejections in the body as well as the status code.
        let envelope: TelegramResponse<T> = response
            .json()
            .await
            .map_err(|e| ChannelError::Decode(format!("{} ({})", e, status)))?;

        if !envelope.ok {
            return Err(ChannelError::Api {
                code: envelope.error_code,
                description: envelope
                    .description
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        envelope
            .result
            .ok_or_else(|| ChannelError::Decode(format!("{} returned ok without result", method)))
    }
}

#[async_trait]
impl ChannelApi for TelegramClient {
    async fn send_message(&self, request: SendMessageRequest) -> Result<SentMessage, ChannelError> {
        self.call("sendMessage", Some(&request)).await
    }

    async fn get_me(&self) -> Result<BotUser, ChannelError> {
        self.call("getMe", None).await
    }
}
