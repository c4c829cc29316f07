use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::pipeline::RunResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub channel_configured: bool,
    pub last_run: Option<LastRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastRun {
    pub finished_at: DateTime<Utc>,
    pub success: bool,
    pub listings_found: usize,
    pub listings_sent: usize,
}

#[derive(Clone)]
pub struct HealthChecker {
    start_time: std::time::Instant,
    channel_configured: bool,
    last_run: Arc<RwLock<Option<LastRun>>>,
}

impl HealthChecker {
    pub fn new(channel_configured: bool) -> Self {
        Self {
            start_time: std::time::Instant::now(),
            channel_configured,
            last_run: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn get_status(&self) -> HealthStatus {
        HealthStatus {
            status: if self.channel_configured {
                "healthy".to_string()
            } else {
                "degraded".to_string()
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            channel_configured: self.channel_configured,
            last_run: self.last_run.read().await.clone(),
        }
    }

    pub async fn record_run(&self, result: &RunResult) {
        *self.last_run.write().await = Some(LastRun {
            finished_at: result.timestamp,
            success: result.success,
            listings_found: result.listings_found,
            listings_sent: result.listings_sent,
        });
    }
}
