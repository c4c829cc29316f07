use serde::{Deserialize, Serialize};

/// One normalized car-for-sale record produced by a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    /// Pre-formatted, currency symbol included (`$24,995`).
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub url: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Listing {
    pub fn new(
        title: impl Into<String>,
        price: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
            year: None,
            mileage: None,
            location: None,
            url: url.into(),
            source: source.into(),
            image: None,
            description: None,
        }
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_mileage(mut self, mileage: impl Into<String>) -> Self {
        self.mileage = Some(mileage.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Title, price, url and source must all carry text.
    pub fn has_required_fields(&self) -> bool {
        [&self.title, &self.price, &self.url, &self.source]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// The part of a listing echoed back to a trigger caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub title: String,
    pub price: String,
    pub source: String,
}

impl From<&Listing> for ListingSummary {
    fn from(listing: &Listing) -> Self {
        Self {
            title: listing.title.clone(),
            price: listing.price.clone(),
            source: listing.source.clone(),
        }
    }
}
