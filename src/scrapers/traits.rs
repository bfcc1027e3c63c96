use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{error, info, warn};

/// Source of page markup.
/// The HTTP implementation lives in `fetch`; tests swap in canned pages.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and return its body, failing on transport errors and
    /// non-success statuses
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Receives status messages and progress while a category is scraped.
/// Implementations must not panic.
pub trait ScrapeObserver: Send + Sync {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    /// Fraction of discovered listings attempted so far, in `0.0..=1.0`
    fn progress(&self, fraction: f64);
}

/// Observer that writes everything to the tracing subscriber.
/// Progress is logged once per whole percent.
#[derive(Debug, Default)]
pub struct TracingObserver {
    last_percent: AtomicU32,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScrapeObserver for TracingObserver {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }

    fn progress(&self, fraction: f64) {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).floor() as u32;
        let previous = self.last_percent.swap(percent, Ordering::Relaxed);
        if percent != previous {
            info!("Progress: {}%", percent);
        }
    }
}
