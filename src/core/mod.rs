pub mod config;
pub mod health;
pub mod logging;
pub mod metrics;

pub use config::{
    ChannelCredentials, Config, ConfigError, PipelineConfig, ServerConfig, TelegramConfig,
};
pub use health::HealthChecker;
pub use metrics::PipelineMetrics;
