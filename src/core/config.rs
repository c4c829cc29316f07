use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN must be set")]
    MissingBotToken,
    #[error("TELEGRAM_CHANNEL_ID must be set")]
    MissingChannelId,
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub pipeline: PipelineConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub channel_id: Option<String>,
    pub api_base: String,
    pub link_preview: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub cron_secret: Option<String>,
    pub message_delay_ms: u64,
    pub header_pause_ms: u64,
    pub source_timeout_secs: u64,
    pub on_demand_limit: usize,
    pub scheduled_limit: usize,
    pub default_query: String,
    pub schedule_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub log_level: String,
}

/// Bot credential and destination, both present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCredentials {
    pub bot_token: String,
    pub channel_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Ok(Config {
            telegram: TelegramConfig {
                bot_token: non_empty_var("TELEGRAM_BOT_TOKEN"),
                channel_id: non_empty_var("TELEGRAM_CHANNEL_ID"),
                api_base: env::var("TELEGRAM_API_BASE")
                    .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
                link_preview: parsed_var("TELEGRAM_LINK_PREVIEW", true)?,
            },
            pipeline: PipelineConfig {
                cron_secret: non_empty_var("CRON_SECRET"),
                message_delay_ms: parsed_var("MESSAGE_DELAY_MS", 1000)?,
                header_pause_ms: parsed_var("HEADER_PAUSE_MS", 1000)?,
                source_timeout_secs: parsed_var("SOURCE_TIMEOUT_SECS", 30)?,
                on_demand_limit: parsed_var("ON_DEMAND_LIMIT", 10)?,
                scheduled_limit: parsed_var("SCHEDULED_LIMIT", 5)?,
                default_query: env::var("DEFAULT_QUERY")
                    .unwrap_or_else(|_| "used-cars".to_string()),
                schedule_interval_secs: parsed_var("SCHEDULE_INTERVAL_SECS", 0)?,
            },
            server: ServerConfig {
                port: parsed_var("SERVER_PORT", 3000)?,
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
        })
    }
}

impl TelegramConfig {
    /// Both the bot token and the channel id are required for anything that publishes.
    pub fn credentials(&self) -> Result<ChannelCredentials, ConfigError> {
        let bot_token = self.bot_token.clone().ok_or(ConfigError::MissingBotToken)?;
        let channel_id = self
            .channel_id
            .clone()
            .ok_or(ConfigError::MissingChannelId)?;

        Ok(ChannelCredentials {
            bot_token,
            channel_id,
        })
    }
}

impl PipelineConfig {
    pub fn message_delay(&self) -> Duration {
        Duration::from_millis(self.message_delay_ms)
    }

    pub fn header_pause(&self) -> Duration {
        Duration::from_millis(self.header_pause_ms)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cron_secret: None,
            message_delay_ms: 1000,
            header_pause_ms: 1000,
            source_timeout_secs: 30,
            on_demand_limit: 10,
            scheduled_limit: 5,
            default_query: "used-cars".to_string(),
            schedule_interval_secs: 0,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
