use async_trait::async_trait;

use crate::scanner::{Listing, SourceAdapter, SourceError};

const SOURCE: &str = "KBB";

/// Kelley Blue Book.
#[derive(Debug, Default, Clone)]
pub struct KbbSource;

#[async_trait]
impl SourceAdapter for KbbSource {
    fn source_name(&self) -> &'static str {
        SOURCE
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Listing>, SourceError> {
        tracing::debug!("🔍 {} search: {}", SOURCE, query);

        Ok(vec![Listing::new(
            "2023 Hyundai Tucson SEL",
            "$31,200",
            "https://www.kbb.com/cars-for-sale/vehicledetails.xhtml?listingId=123",
            SOURCE,
        )
        .with_year("2023")
        .with_mileage("8,000 miles")
        .with_location("Phoenix, AZ")
        .with_description("Hybrid, excellent fuel economy, under warranty")])
    }
}
