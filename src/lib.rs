//! Scraper for real-estate listings on unegui.mn.
//!
//! [`UneguiScraper::scrape_category`] walks a category's index pages,
//! fetches every listing with a bounded worker pool and returns a
//! [`ListingBatch`]. The batch can be narrowed with a [`DateFilter`] and
//! written out through [`export`].

pub mod categories;
pub mod dates;
pub mod export;
pub mod models;
pub mod scrapers;

pub use categories::CategoryDescriptor;
pub use dates::normalize_date;
pub use models::{DateFilter, ListingBatch, ListingRecord};
pub use scrapers::{ScrapeObserver, ScraperConfig, TracingObserver, UneguiScraper};
