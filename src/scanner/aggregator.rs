use futures::future::join_all;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use super::listing::Listing;
use super::source::{SourceAdapter, SourceError};
use crate::core::PipelineMetrics;

/// Fan-out/fan-in collector over every registered source.
///
/// Built once at start-up and shared by reference with the orchestrator.
pub struct Aggregator {
    sources: Vec<Arc<dyn SourceAdapter>>,
    source_timeout: Duration,
    default_query: String,
    metrics: Option<PipelineMetrics>,
}

impl Aggregator {
    pub fn new(
        sources: Vec<Arc<dyn SourceAdapter>>,
        source_timeout: Duration,
        default_query: impl Into<String>,
    ) -> Self {
        Self {
            sources,
            source_timeout,
            default_query: default_query.into(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: PipelineMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.source_name()).collect()
    }

    /// Queries every source concurrently and concatenates what succeeded,
    /// in registration order. Never fails: a broken source contributes nothing.
    pub async fn collect_all(&self, query: Option<&str>) -> Vec<Listing> {
        let query = query.unwrap_or(&self.default_query);

        let fetches = self
            .sources
            .iter()
            .map(|source| self.fetch_source(source.as_ref(), query));
        let per_source = join_all(fetches).await;

        let listings: Vec<Listing> = per_source.into_iter().flatten().collect();

        tracing::info!(
            "📦 Collected {} listings from {} sources",
            listings.len(),
            self.sources.len()
        );

        listings
    }

    /// First `limit` listings of [`Aggregator::collect_all`] for the default
    /// query. Positional: no ranking beyond source order.
    pub async fn top_deals(&self, limit: usize) -> Vec<Listing> {
        let mut listings = self.collect_all(None).await;
        listings.truncate(limit);
        listings
    }

    async fn fetch_source(&self, source: &dyn SourceAdapter, query: &str) -> Vec<Listing> {
        let name = source.source_name();
        let guarded = AssertUnwindSafe(source.fetch(query)).catch_unwind();

        let outcome = match tokio::time::timeout(self.source_timeout, guarded).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(SourceError::Unavailable("adapter panicked".to_string())),
            Err(_) => Err(SourceError::Timeout(self.source_timeout)),
        };

        match outcome {
            Ok(listings) => {
                let total = listings.len();
                let valid: Vec<Listing> = listings
                    .into_iter()
                    .filter(Listing::has_required_fields)
                    .collect();

                if valid.len() < total {
                    tracing::warn!(
                        "⚠️  {}: dropped {} listings missing required fields",
                        name,
                        total - valid.len()
                    );
                }
                tracing::debug!("{} returned {} listings", name, valid.len());

                if let Some(metrics) = &self.metrics {
                    metrics.record_collected(name, valid.len());
                }
                valid
            }
            Err(e) => {
                tracing::warn!("❌ {} scraping error: {}", name, e);
                if let Some(metrics) = &self.metrics {
                    metrics.record_source_failure(name);
                }
                Vec::new()
            }
        }
    }
}
