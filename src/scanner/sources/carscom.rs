use async_trait::async_trait;

use crate::scanner::{Listing, SourceAdapter, SourceError};

const SOURCE: &str = "Cars.com";

#[derive(Debug, Default, Clone)]
pub struct CarsComSource;

#[async_trait]
impl SourceAdapter for CarsComSource {
    fn source_name(&self) -> &'static str {
        SOURCE
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Listing>, SourceError> {
        tracing::debug!("🔍 {} search: {}", SOURCE, query);

        Ok(vec![
            Listing::new(
                "2023 Ford Mustang GT",
                "$42,900",
                "https://www.cars.com/vehicledetail/detail/123/overview/",
                SOURCE,
            )
            .with_year("2023")
            .with_mileage("5,000 miles")
            .with_location("Houston, TX")
            .with_description("Premium package, performance exhaust"),
            Listing::new(
                "2020 Tesla Model 3 Long Range",
                "$38,500",
                "https://www.cars.com/vehicledetail/detail/124/overview/",
                SOURCE,
            )
            .with_year("2020")
            .with_mileage("35,000 miles")
            .with_location("Austin, TX")
            .with_description("Autopilot, great range, well-maintained"),
        ])
    }
}
