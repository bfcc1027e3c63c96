use crate::models::{ListingBatch, ListingRecord};
use crate::scrapers::detail::scrape_listing;
use crate::scrapers::fetch::HttpFetcher;
use crate::scrapers::index::{collect_listing_links, last_page};
use crate::scrapers::traits::{Fetcher, ScrapeObserver};
use crate::scrapers::types::ScraperConfig;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

/// Scraper for unegui.mn category listings
pub struct UneguiScraper {
    fetcher: Arc<dyn Fetcher>,
    config: ScraperConfig,
}

impl UneguiScraper {
    /// Create a scraper backed by a real HTTP client
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), config))
    }

    /// Create a scraper over any markup source
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, config: ScraperConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Scrape every listing of one category.
    ///
    /// Index pages are walked sequentially and any failure there aborts the
    /// category. Detail pages are fetched by a pool of `concurrency` workers;
    /// a failed listing is reported and left out. Records arrive in
    /// completion order.
    pub async fn scrape_category(
        &self,
        category_url: &str,
        concurrency: usize,
        observer: Arc<dyn ScrapeObserver>,
    ) -> Result<ListingBatch> {
        info!("Starting scrape of {}", category_url);

        let pages = last_page(self.fetcher.as_ref(), category_url).await?;
        let links = collect_listing_links(
            self.fetcher.as_ref(),
            category_url,
            pages,
            &self.config.origin,
        )
        .await?;

        let total = links.len();
        observer.info(&format!("Found {} ads.", total));
        observer.progress(0.0);

        if total == 0 {
            observer.progress(1.0);
            return Ok(ListingBatch::new());
        }

        let workers = concurrency.max(1).min(total);
        debug!("Fetching {} listings with {} workers", total, workers);

        let (queue_tx, queue_rx) = mpsc::channel::<String>(total);
        for url in links {
            queue_tx.send(url).await?;
        }
        drop(queue_tx);

        let queue_rx = Arc::new(Mutex::new(queue_rx));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Option<ListingRecord>>();

        for id in 0..workers {
            spawn_worker(
                id,
                Arc::clone(&self.fetcher),
                Arc::clone(&queue_rx),
                done_tx.clone(),
                Arc::clone(&observer),
            );
        }
        // Each worker holds its own sender; the channel closes once all finish
        drop(done_tx);

        let mut batch = ListingBatch::new();
        let mut completed = 0usize;
        while let Some(outcome) = done_rx.recv().await {
            completed += 1;
            if let Some(record) = outcome {
                batch.push(record);
            }
            observer.progress((completed as f64 / total as f64).min(1.0));
        }

        if completed < total {
            // A worker died mid-listing; count the rest as attempted
            observer.error(&format!(
                "{} listing(s) were not processed",
                total - completed
            ));
            observer.progress(1.0);
        }

        info!(
            "Scraped {} of {} listings from {}",
            batch.len(),
            total,
            category_url
        );
        Ok(batch)
    }
}

fn spawn_worker(
    id: usize,
    fetcher: Arc<dyn Fetcher>,
    queue: Arc<Mutex<mpsc::Receiver<String>>>,
    done: mpsc::UnboundedSender<Option<ListingRecord>>,
    observer: Arc<dyn ScrapeObserver>,
) {
    tokio::spawn(async move {
        loop {
            // Release the queue lock before fetching
            let next = queue.lock().await.recv().await;
            let Some(url) = next else {
                break;
            };

            let outcome = scrape_listing(fetcher.as_ref(), &url, observer.as_ref()).await;
            if done.send(outcome).is_err() {
                break;
            }
        }
        debug!("Worker {} finished", id);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StaticPages(HashMap<String, String>);

    #[async_trait]
    impl Fetcher for StaticPages {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("404 for {}", url))
        }
    }

    #[derive(Default)]
    struct Quiet;

    impl ScrapeObserver for Quiet {
        fn info(&self, _: &str) {}
        fn warn(&self, _: &str) {}
        fn error(&self, _: &str) {}
        fn progress(&self, _: f64) {}
    }

    const BASE: &str = "https://www.unegui.mn/l-hdlh/gazar/";

    #[tokio::test]
    async fn test_category_without_links_is_empty() {
        let mut pages = HashMap::new();
        pages.insert(BASE.to_string(), "<html></html>".to_string());
        pages.insert(format!("{}?page=1", BASE), "<html></html>".to_string());
        let scraper =
            UneguiScraper::with_fetcher(Arc::new(StaticPages(pages)), ScraperConfig::default());

        let batch = scraper.scrape_category(BASE, 4, Arc::new(Quiet)).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_index_is_fatal() {
        let scraper = UneguiScraper::with_fetcher(
            Arc::new(StaticPages(HashMap::new())),
            ScraperConfig::default(),
        );

        let err = scraper
            .scrape_category(BASE, 4, Arc::new(Quiet))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Category index unavailable"));
    }
}
