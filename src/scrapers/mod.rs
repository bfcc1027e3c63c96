pub mod detail;
pub mod fetch;
pub mod index;
pub mod traits;
pub mod types;
pub mod unegui;

pub use fetch::HttpFetcher;
pub use traits::{Fetcher, ScrapeObserver, TracingObserver};
pub use types::ScraperConfig;
pub use unegui::UneguiScraper;
