use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection and site settings for a scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Scheme and host prepended to relative listing links
    pub origin: String,
    /// Per-request timeout, covering connect and read
    pub timeout: Duration,
    /// Value of the User-Agent header
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.unegui.mn".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}
