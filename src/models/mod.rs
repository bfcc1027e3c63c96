use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fixed columns every exported table starts with, in order.
pub const BASE_COLUMNS: [&str; 6] = ["Title", "Price", "Ad_ID", "Location", "Date", "URL"];

/// One scraped classified ad.
///
/// Everything except `url` may be missing; a missing value is `None`,
/// never a placeholder string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub title: Option<String>,
    pub price: Option<String>,
    pub ad_id: Option<String>,
    pub location: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub url: String,
    /// Characteristics listed on the detail page, keyed by their label.
    /// The key set differs between categories and between listings.
    pub properties: IndexMap<String, String>,
}

impl ListingRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            title: None,
            price: None,
            ad_id: None,
            location: None,
            date: None,
            url: url.into(),
            properties: IndexMap::new(),
        }
    }

    /// Value of a base column or extra property, formatted for a table cell.
    pub fn cell(&self, column: &str) -> Option<String> {
        match column {
            "Title" => self.title.clone(),
            "Price" => self.price.clone(),
            "Ad_ID" => self.ad_id.clone(),
            "Location" => self.location.clone(),
            "Date" => self.date.map(format_date),
            "URL" => Some(self.url.clone()),
            other => self.properties.get(other).cloned(),
        }
    }
}

pub fn format_date(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Which publish dates to keep after a scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    AllDates,
    /// Inclusive calendar-day range.
    Range { start: NaiveDate, end: NaiveDate },
}

impl DateFilter {
    pub fn matches(&self, record: &ListingRecord) -> bool {
        match self {
            DateFilter::AllDates => true,
            DateFilter::Range { start, end } => match record.date {
                Some(date) => {
                    let from = start.and_time(NaiveTime::MIN);
                    let to = end.and_time(last_instant());
                    from <= date && date <= to
                }
                None => false,
            },
        }
    }

    /// Suffix used in output file names.
    pub fn suffix(&self) -> String {
        match self {
            DateFilter::AllDates => "all".to_string(),
            DateFilter::Range { start, end } => format!("{}_{}", start, end),
        }
    }
}

fn last_instant() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
}

/// All records scraped from one category in one run.
///
/// Records are kept in arrival order; sort explicitly when a stable order
/// is needed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingBatch {
    records: Vec<ListingRecord>,
}

impl ListingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ListingRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListingRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn sort_by_url(&mut self) {
        self.records.sort_by(|a, b| a.url.cmp(&b.url));
    }

    /// Base columns followed by every extra property key, first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: IndexMap<String, ()> = BASE_COLUMNS
            .iter()
            .map(|c| (c.to_string(), ()))
            .collect();
        for record in &self.records {
            for key in record.properties.keys() {
                if !columns.contains_key(key) {
                    columns.insert(key.clone(), ());
                }
            }
        }
        columns.into_keys().collect()
    }

    pub fn filter(&self, filter: &DateFilter) -> ListingBatch {
        ListingBatch {
            records: self
                .records
                .iter()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect(),
        }
    }
}

impl From<Vec<ListingRecord>> for ListingBatch {
    fn from(records: Vec<ListingRecord>) -> Self {
        Self { records }
    }
}

impl IntoIterator for ListingBatch {
    type Item = ListingRecord;
    type IntoIter = std::vec::IntoIter<ListingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
