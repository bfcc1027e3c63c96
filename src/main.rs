use anyhow::{bail, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use unegui_scout::categories::{self, CategoryDescriptor};
use unegui_scout::export::{self, ExportFormat};
use unegui_scout::{DateFilter, ScraperConfig, TracingObserver, UneguiScraper};

/// Scrape real-estate listings from unegui.mn by category
#[derive(Debug, Parser)]
#[command(name = "unegui-scout", version, about)]
struct Cli {
    /// Category keys to scrape (see --list)
    #[arg(value_name = "CATEGORY")]
    categories: Vec<String>,

    /// Scrape every known category
    #[arg(long, default_value_t = false)]
    all_categories: bool,

    /// Print the known categories and exit
    #[arg(long, default_value_t = false)]
    list: bool,

    /// Keep listings of any publish date
    #[arg(long, default_value_t = false, conflicts_with_all = ["from", "to"])]
    all_dates: bool,

    /// First publish day to keep (default: a week ago)
    #[arg(long, value_name = "YYYY-MM-DD")]
    from: Option<NaiveDate>,

    /// Last publish day to keep (default: today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    to: Option<NaiveDate>,

    /// Max parallel detail-page fetches
    #[arg(short = 'j', long, value_name = "N", default_value_t = 20,
          value_parser = clap::value_parser!(u16).range(1..=50))]
    concurrency: u16,

    /// Directory the result files are written to
    #[arg(short, long, value_name = "DIR", default_value = "./")]
    output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    timeout: u64,
}

impl Cli {
    /// Requested date range; defaults to the week ending `today`
    fn date_filter(&self, today: NaiveDate) -> Result<DateFilter> {
        if self.all_dates {
            return Ok(DateFilter::AllDates);
        }
        let start = self.from.unwrap_or(today - Duration::days(7));
        let end = self.to.unwrap_or(today);
        if start > end {
            bail!("--from {} is after --to {}", start, end);
        }
        Ok(DateFilter::Range { start, end })
    }

    fn selected(&self) -> Result<Vec<&'static CategoryDescriptor>> {
        if self.all_categories {
            return Ok(categories::all().iter().collect());
        }
        if self.categories.is_empty() {
            bail!("No categories given; pass one or more keys or --all-categories");
        }
        self.categories
            .iter()
            .map(|key| match categories::find(key) {
                Some(category) => Ok(category),
                None => bail!("Unknown category '{}' (see --list)", key),
            })
            .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.list {
        for category in categories::all() {
            println!("{:<18} {}", category.key, category.label);
        }
        return Ok(());
    }

    let selected = cli.selected()?;
    let filter = cli.date_filter(Local::now().date_naive())?;

    let config = ScraperConfig {
        timeout: std::time::Duration::from_secs(cli.timeout),
        ..ScraperConfig::default()
    };
    let scraper = UneguiScraper::new(config)?;

    info!("🏘️ Unegui.mn Real Estate Scraper");

    let mut failed = 0usize;
    for category in selected {
        info!("📂 {}", category.label);
        if let Err(e) = run_category(&scraper, category, &filter, &cli).await {
            error!("{} failed: {:#}", category.key, e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} category scrape(s) failed", failed);
    }
    Ok(())
}

async fn run_category(
    scraper: &UneguiScraper,
    category: &CategoryDescriptor,
    filter: &DateFilter,
    cli: &Cli,
) -> Result<()> {
    let observer = Arc::new(TracingObserver::new());
    let batch = scraper
        .scrape_category(category.url, usize::from(cli.concurrency), observer)
        .await?;

    let batch = batch.filter(filter);
    match filter {
        DateFilter::Range { start, end } => {
            info!("✅ Scraped {} ads between {} and {}.", batch.len(), start, end)
        }
        DateFilter::AllDates => info!("✅ Scraped {} ads (all dates).", batch.len()),
    }

    let filename = export::output_filename(
        category,
        filter,
        cli.format,
        Local::now().naive_local(),
    );
    let path = export::save_batch(&batch, cli.format, &cli.output_dir.join(filename))?;
    info!("💾 Saved to: {}", path.display());

    Ok(())
}
