//! Field extraction from a single listing page.

use crate::dates::normalize_date_at;
use crate::models::{ListingRecord, BASE_COLUMNS};
use crate::scrapers::traits::{Fetcher, ScrapeObserver};
use chrono::{Local, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::debug;

const PUBLISHED_LABEL: &str = "Нийтэлсэн:";

/// Selectors for the detail page template(s)
struct DetailSelectors {
    title: Selector,
    price: Selector,
    sku: Selector,
    address: Selector,
    fallback_location: Selector,
    span: Selector,
    chars: Selector,
    chars_key: Selector,
    chars_value: Selector,
}

impl DetailSelectors {
    fn get() -> &'static Self {
        static SELECTORS: OnceLock<DetailSelectors> = OnceLock::new();
        SELECTORS.get_or_init(Self::new)
    }

    fn new() -> Self {
        let parse = |css: &str| Selector::parse(css).expect("valid detail selector");
        Self {
            title: parse("#ad-title"),
            price: parse(r#"meta[itemprop="price"]"#),
            sku: parse(r#"span[itemprop="sku"]"#),
            address: parse("span[itemprop='address']"),
            fallback_location: parse("#show-post-render-app a[href] span"),
            span: parse("span"),
            chars: parse("ul.chars-column > li"),
            chars_key: parse(".key-chars"),
            chars_value: parse(".value-chars"),
        }
    }
}

/// Text of an element with each text node trimmed and joined
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(stripped_text)
        .filter(|t| !t.is_empty())
}

/// Characteristic labels that clash with a fixed column get a suffix so
/// both values survive in the table.
fn property_key(label: &str) -> String {
    if BASE_COLUMNS.contains(&label) {
        let renamed = format!("{} (chars)", label);
        debug!("Characteristic '{}' clashes with a fixed column, stored as '{}'", label, renamed);
        renamed
    } else {
        label.to_string()
    }
}

/// Extract every field the page offers. Missing elements leave their field
/// empty; nothing here fails.
pub fn parse_listing(html: &str, url: &str, now: NaiveDateTime) -> ListingRecord {
    let document = Html::parse_document(html);
    let sel = DetailSelectors::get();
    let mut record = ListingRecord::new(url);

    record.title = first_text(&document, &sel.title);
    record.price = document
        .select(&sel.price)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty());
    record.ad_id = first_text(&document, &sel.sku);
    // Older templates have no itemprop address
    record.location = first_text(&document, &sel.address)
        .or_else(|| first_text(&document, &sel.fallback_location));

    record.date = document
        .select(&sel.span)
        .map(stripped_text)
        .find(|text| text.contains(PUBLISHED_LABEL))
        .and_then(|text| normalize_date_at(text.replace(PUBLISHED_LABEL, "").trim(), now));

    for item in document.select(&sel.chars) {
        let key = item.select(&sel.chars_key).next();
        let value = item.select(&sel.chars_value).next();
        if let (Some(key), Some(value)) = (key, value) {
            let label = stripped_text(key);
            let label = label.trim_end_matches(':');
            if label.is_empty() {
                continue;
            }
            record.properties.insert(property_key(label), stripped_text(value));
        }
    }

    record
}

/// Fetch and parse one listing. Failures are reported to the observer and
/// yield `None` so the rest of the batch carries on.
pub async fn scrape_listing(
    fetcher: &dyn Fetcher,
    url: &str,
    observer: &dyn ScrapeObserver,
) -> Option<ListingRecord> {
    match fetcher.fetch(url).await {
        Ok(html) => Some(parse_listing(&html, url, Local::now().naive_local())),
        Err(e) => {
            observer.warn(&format!("Failed to scrape {}: {:#}", url, e));
            None
        }
    }
}
