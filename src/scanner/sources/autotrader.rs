use async_trait::async_trait;

use crate::scanner::{Listing, SourceAdapter, SourceError};

const SOURCE: &str = "AutoTrader";

/// AutoTrader inventory. Serves a fixed catalog until page extraction lands.
#[derive(Debug, Default, Clone)]
pub struct AutoTraderSource;

#[async_trait]
impl SourceAdapter for AutoTraderSource {
    fn source_name(&self) -> &'static str {
        SOURCE
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Listing>, SourceError> {
        tracing::debug!("🔍 {} search: {}", SOURCE, query);

        Ok(vec![
            Listing::new(
                "2022 Toyota Camry SE",
                "$24,995",
                "https://www.autotrader.com/cars-for-sale/vehicledetails.xhtml?listingId=123",
                SOURCE,
            )
            .with_year("2022")
            .with_mileage("15,000 miles")
            .with_location("Los Angeles, CA")
            .with_description("Excellent condition, one owner, clean title"),
            Listing::new(
                "2021 Honda Civic LX",
                "$21,500",
                "https://www.autotrader.com/cars-for-sale/vehicledetails.xhtml?listingId=124",
                SOURCE,
            )
            .with_year("2021")
            .with_mileage("22,000 miles")
            .with_location("San Diego, CA")
            .with_description("Great fuel economy, well maintained"),
        ])
    }
}
