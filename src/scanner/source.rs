use async_trait::async_trait;
use thiserror::Error;

use super::listing::Listing;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// One external listing provider.
///
/// Implementations map whatever the provider returns into [`Listing`]s tagged
/// with [`SourceAdapter::source_name`]. An `Err` is never fatal: the
/// aggregator logs it and treats the source as having returned nothing.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable display name, also used as the `source` field and metrics label.
    fn source_name(&self) -> &'static str;

    async fn fetch(&self, query: &str) -> Result<Vec<Listing>, SourceError>;
}
