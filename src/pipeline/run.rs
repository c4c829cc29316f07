use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scanner::{Listing, ListingSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Manual,
    Scheduled,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Manual => "manual",
            Trigger::Scheduled => "scheduled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Published,
    /// Aggregation came back empty; nothing was sent. Not a failure.
    NoListings,
}

/// Summary of one aggregate-and-publish cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub run_id: Uuid,
    pub trigger: Trigger,
    pub outcome: RunOutcome,
    pub success: bool,
    pub listings_found: usize,
    pub listings_sent: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub listings: Vec<ListingSummary>,
}

impl RunResult {
    pub fn published(trigger: Trigger, listings: &[Listing], listings_sent: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            trigger,
            outcome: RunOutcome::Published,
            success: true,
            listings_found: listings.len(),
            listings_sent,
            timestamp: Utc::now(),
            message: None,
            listings: listings.iter().map(ListingSummary::from).collect(),
        }
    }

    pub fn nothing_found(trigger: Trigger) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            trigger,
            outcome: RunOutcome::NoListings,
            success: false,
            listings_found: 0,
            listings_sent: 0,
            timestamp: Utc::now(),
            message: Some("No listings found".to_string()),
            listings: Vec::new(),
        }
    }

    pub fn outcome_label(&self) -> &'static str {
        match self.outcome {
            RunOutcome::Published => "published",
            RunOutcome::NoListings => "no_listings",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let listings = vec![Listing::new("2023 Ford Mustang GT", "$42,900", "https://c.example/1", "Cars.com")];
        let result = RunResult::published(Trigger::Scheduled, &listings, 1);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["listingsFound"], 1);
        assert_eq!(json["listingsSent"], 1);
        assert_eq!(json["trigger"], "scheduled");
        assert_eq!(json["outcome"], "published");
        assert_eq!(json["listings"][0]["source"], "Cars.com");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_nothing_found_is_not_success() {
        let result = RunResult::nothing_found(Trigger::Manual);
        assert!(!result.success);
        assert_eq!(result.listings_sent, 0);
        assert_eq!(result.outcome_label(), "no_listings");
    }
}
