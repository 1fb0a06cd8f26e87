//! Scrape source and platform normalization for Parsifly.
//!
//! [`ApifyClient`] runs the per-platform Apify actors and returns the raw
//! dataset items. [`adapt`] turns one raw item into a canonical
//! [`parsifly_core::Post`], using [`compute_engagement`] and
//! [`normalize_timestamp`] for the derived fields.

pub mod client;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod source;
pub mod timestamp;
pub mod types;

mod fields;
mod rate_limit;

pub use client::ApifyClient;
pub use error::ScraperError;
pub use metrics::{compute_engagement, EngagementCounts, EngagementRates};
pub use normalize::{adapt, adapt_all};
pub use source::ScrapeSource;
pub use timestamp::{normalize_timestamp, normalize_timestamp_str};
pub use types::{ActorInput, RunData};
