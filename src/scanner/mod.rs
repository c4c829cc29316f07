pub mod aggregator;
pub mod listing;
pub mod source;
pub mod sources;

pub use aggregator::Aggregator;
pub use listing::{Listing, ListingSummary};
pub use source::{SourceAdapter, SourceError};
