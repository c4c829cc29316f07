pub mod autotrader;
pub mod cargurus;
pub mod carscom;
pub mod kbb;

pub use autotrader::AutoTraderSource;
pub use cargurus::CarGurusSource;
pub use carscom::CarsComSource;
pub use kbb::KbbSource;

use std::sync::Arc;

use super::SourceAdapter;

/// The production sources in registration order.
pub fn default_sources() -> Vec<Arc<dyn SourceAdapter>> {
    vec![
        Arc::new(AutoTraderSource),
        Arc::new(CarsComSource),
        Arc::new(CarGurusSource),
        Arc::new(KbbSource),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sources_tag_their_listings() {
        for source in default_sources() {
            let listings = source.fetch("used-cars").await.unwrap();
            assert!(!listings.is_empty());
            for listing in listings {
                assert_eq!(listing.source, source.source_name());
                assert!(listing.has_required_fields());
            }
        }
    }

    #[test]
    fn test_registration_order() {
        let names: Vec<_> = default_sources().iter().map(|s| s.source_name()).collect();
        assert_eq!(names, vec!["AutoTrader", "Cars.com", "CarGurus", "KBB"]);
    }
}
