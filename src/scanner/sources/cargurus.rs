use async_trait::async_trait;

use crate::scanner::{Listing, SourceAdapter, SourceError};

const SOURCE: &str = "CarGurus";
const DETAILS_URL: &str =
    "https://www.cargurus.com/Cars/inventorylisting/viewDetailsFilterViewInventoryListing.action";

#[derive(Debug, Default, Clone)]
pub struct CarGurusSource;

#[async_trait]
impl SourceAdapter for CarGurusSource {
    fn source_name(&self) -> &'static str {
        SOURCE
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Listing>, SourceError> {
        tracing::debug!("🔍 {} search: {}", SOURCE, query);

        Ok(vec![
            Listing::new(
                "2021 BMW 3 Series 330i",
                "$35,900",
                format!("{DETAILS_URL}?sourceContext=123"),
                SOURCE,
            )
            .with_year("2021")
            .with_mileage("18,000 miles")
            .with_location("Miami, FL")
            .with_description("M Sport package, navigation, premium sound"),
            Listing::new(
                "2022 Mazda CX-5 Touring",
                "$28,700",
                format!("{DETAILS_URL}?sourceContext=124"),
                SOURCE,
            )
            .with_year("2022")
            .with_mileage("12,000 miles")
            .with_location("Tampa, FL")
            .with_description("AWD, sunroof, leather seats"),
        ])
    }
}
