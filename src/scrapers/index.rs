//! Index pages: pagination discovery and listing-link collection.

use crate::scrapers::traits::Fetcher;
use anyhow::{Context, Result};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use tracing::debug;

const LISTING_ANCHOR: &str = "a.mask[href^='/adv/']";

fn page_param() -> &'static Regex {
    static PAGE_PARAM: OnceLock<Regex> = OnceLock::new();
    PAGE_PARAM.get_or_init(|| Regex::new(r"[?&]page=(\d+)").expect("valid page regex"))
}

/// Highest `page=N` value linked from the page, or 1 without pagination links
pub fn parse_last_page(html: &str) -> u32 {
    let document = Html::parse_document(html);
    let anchor = Selector::parse("a[href]").expect("valid anchor selector");

    document
        .select(&anchor)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| page_param().captures(href))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max()
        .unwrap_or(1)
}

/// Absolute listing URLs on one index page, in document order
pub fn parse_listing_links(html: &str, origin: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchor = Selector::parse(LISTING_ANCHOR).expect("valid listing selector");
    let origin = origin.trim_end_matches('/');

    document
        .select(&anchor)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| format!("{}{}", origin, href))
        .collect()
}

/// Number of index pages a category spans.
/// Any fetch failure is fatal for the category.
pub async fn last_page(fetcher: &dyn Fetcher, category_url: &str) -> Result<u32> {
    let html = fetcher
        .fetch(category_url)
        .await
        .with_context(|| format!("Category index unavailable: {}", category_url))?;
    let pages = parse_last_page(&html);
    debug!("{} spans {} page(s)", category_url, pages);
    Ok(pages)
}

pub fn page_url(category_url: &str, page: u32) -> String {
    format!("{}?page={}", category_url, page)
}

/// Walk pages `1..=pages` one after another and gather every listing link.
pub async fn collect_listing_links(
    fetcher: &dyn Fetcher,
    category_url: &str,
    pages: u32,
    origin: &str,
) -> Result<Vec<String>> {
    let mut links = Vec::new();

    for page in 1..=pages {
        let url = page_url(category_url, page);
        let html = fetcher
            .fetch(&url)
            .await
            .with_context(|| format!("Index page {} unavailable", url))?;
        let found = parse_listing_links(&html, origin);
        debug!("Page {} yielded {} listing links", page, found.len());
        links.extend(found);
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_is_the_maximum() {
        let html = r#"<html><body>
            <a href="/l-hdlh/?page=1">1</a>
            <a href="/l-hdlh/?page=2">2</a>
            <a href="/l-hdlh/?sort=new&page=5">5</a>
            <a href="/about">about</a>
        </body></html>"#;
        assert_eq!(parse_last_page(html), 5);
    }

    #[test]
    fn test_no_pagination_means_one_page() {
        let html = r#"<a href="/adv/1_x/">x</a><a href="/l-hdlh/?homepage=3">y</a>"#;
        assert_eq!(parse_last_page(html), 1);
    }

    #[test]
    fn test_listing_links_are_absolute_and_ordered() {
        let html = r#"
            <a class="mask" href="/adv/100_first/">1</a>
            <a class="other" href="/adv/999_skip/">no mask</a>
            <a class="mask" href="/banner/">not a listing</a>
            <a class="mask" href="/adv/200_second/">2</a>
        "#;
        assert_eq!(
            parse_listing_links(html, "https://www.unegui.mn/"),
            vec![
                "https://www.unegui.mn/adv/100_first/",
                "https://www.unegui.mn/adv/200_second/",
            ]
        );
    }

    #[test]
    fn test_page_url() {
        assert_eq!(
            page_url("https://www.unegui.mn/l-hdlh/gazar/", 3),
            "https://www.unegui.mn/l-hdlh/gazar/?page=3"
        );
    }
}
