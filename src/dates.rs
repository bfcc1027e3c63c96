//! Publish-date normalization for listing pages.
//!
//! The site prints recent dates relative to the reader ("Өнөөдөр 14:30",
//! "Өчигдөр 09:00") and older ones in an ISO-like form.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

pub const TODAY_MARKER: &str = "Өнөөдөр";
pub const YESTERDAY_MARKER: &str = "Өчигдөр";

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalize a raw date string against the current local time.
///
/// Returns `None` when the text cannot be read as a date.
pub fn normalize_date(raw: &str) -> Option<NaiveDateTime> {
    normalize_date_at(raw, Local::now().naive_local())
}

/// Same as [`normalize_date`] with an explicit reference time.
pub fn normalize_date_at(raw: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let text = raw.trim();

    if text.contains(TODAY_MARKER) {
        return at_time_of_day(now.date(), &text.replace(TODAY_MARKER, ""));
    }
    if text.contains(YESTERDAY_MARKER) {
        let yesterday = now.date() - Duration::days(1);
        return at_time_of_day(yesterday, &text.replace(YESTERDAY_MARKER, ""));
    }

    parse_iso(text)
}

fn at_time_of_day(day: NaiveDate, time: &str) -> Option<NaiveDateTime> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .ok()
        .map(|t| day.and_time(t))
}

fn parse_iso(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(18, 45, 12)
            .unwrap()
    }

    #[test]
    fn test_today_marker_uses_reference_date() {
        let parsed = normalize_date_at("Өнөөдөр 14:30", reference()).unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2024, 5, 20).unwrap().and_hms_opt(14, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_yesterday_marker_subtracts_one_day() {
        let parsed = normalize_date_at("  Өчигдөр 09:00 ", reference()).unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2024, 5, 19).unwrap().and_hms_opt(9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_yesterday_across_month_boundary() {
        let first = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let parsed = normalize_date_at("Өчигдөр 23:15", first).unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(23, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_iso_forms_match_direct_parse() {
        let cases = [
            ("2024-05-01 10:15", "%Y-%m-%d %H:%M"),
            ("2024-05-01T10:15:30", "%Y-%m-%dT%H:%M:%S"),
            ("2024-05-01 10:15:30.250", "%Y-%m-%d %H:%M:%S%.f"),
        ];
        for (text, fmt) in cases {
            let expected = NaiveDateTime::parse_from_str(text, fmt).unwrap();
            assert_eq!(normalize_date_at(text, reference()), Some(expected), "{text}");
        }
    }

    #[test]
    fn test_bare_date_is_midnight() {
        let parsed = normalize_date_at("2024-04-02", reference()).unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2024, 4, 2).unwrap().and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_offset_keeps_wall_clock_time() {
        let parsed = normalize_date_at("2024-05-01T10:15:00+08:00", reference()).unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(10, 15, 0).unwrap());
    }

    #[test]
    fn test_unparseable_text_is_none_not_now() {
        assert_eq!(normalize_date_at("not a date", reference()), None);
        assert_eq!(normalize_date_at("", reference()), None);
        assert_eq!(normalize_date_at("Өнөөдөр оройн", reference()), None);
    }

    #[test]
    fn test_normalize_date_uses_local_clock() {
        let today = Local::now().date_naive();
        let parsed = normalize_date("Өнөөдөр 14:30").unwrap();
        // The clock may tick past midnight between the two reads.
        assert!(parsed.date() == today || parsed.date() == today + Duration::days(1));
        assert_eq!(parsed.time(), NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    }
}
