use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static ISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:T[\d:.]+(?:Z|[+-]\d{2}:?\d{2})?)?$").unwrap());
static MONTH_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{3})\.?\s+(\d{1,2}),?\s+(\d{4})$").unwrap());
static US_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());

/// Parse the date shapes we recognize, checked in order:
/// `2023-10-15`, `Oct 15, 2023`, `10/15/2023`. The whole value must be a date;
/// an ISO value may carry a `T..` time part, which is dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Some(c) = ISO_RE.captures(s) {
        return ymd(&c[1], &c[2], &c[3]);
    }
    if let Some(c) = MONTH_NAME_RE.captures(s) {
        let joined = format!("{} {} {}", &c[1], &c[2], &c[3]);
        return NaiveDate::parse_from_str(&joined, "%b %d %Y").ok();
    }
    if let Some(c) = US_RE.captures(s) {
        return ymd(&c[3], &c[1], &c[2]);
    }
    None
}

fn ymd(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

/// ISO `YYYY-MM-DD` when the value parses, the original text when it does not,
/// `None` for missing or blank input.
pub fn normalize_date(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(match parse_date(raw) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn iso_passthrough() {
        assert_eq!(normalize_date(Some("2024-02-29")).as_deref(), Some("2024-02-29"));
    }

    #[test]
    fn month_name() {
        assert_eq!(normalize_date(Some("Oct 15, 2023")).as_deref(), Some("2023-10-15"));
        assert_eq!(normalize_date(Some("Jan 5, 2024")).as_deref(), Some("2024-01-05"));
        assert_eq!(normalize_date(Some("sep. 01, 2022")).as_deref(), Some("2022-09-01"));
    }

    #[test]
    fn us_slashes() {
        assert_eq!(normalize_date(Some("03/07/2024")).as_deref(), Some("2024-03-07"));
    }

    #[test]
    fn malformed_match_keeps_original() {
        assert_eq!(normalize_date(Some("2023-13-45")).as_deref(), Some("2023-13-45"));
        assert_eq!(normalize_date(Some("Foo 12, 2023")).as_deref(), Some("Foo 12, 2023"));
        assert_eq!(normalize_date(Some("02/30/2023")).as_deref(), Some("02/30/2023"));
    }

    #[test]
    fn unrecognized_keeps_original() {
        assert_eq!(normalize_date(Some("3 days ago")).as_deref(), Some("3 days ago"));
        assert_eq!(normalize_date(Some("October 15, 2023")).as_deref(), Some("October 15, 2023"));
    }

    #[test]
    fn trailing_text_keeps_original() {
        assert_eq!(
            normalize_date(Some("2023-10-15 or later")).as_deref(),
            Some("2023-10-15 or later")
        );
        assert_eq!(
            normalize_date(Some("Oct 15, 2023 (tentative)")).as_deref(),
            Some("Oct 15, 2023 (tentative)")
        );
        assert_eq!(normalize_date(Some("10/15/2023ish")).as_deref(), Some("10/15/2023ish"));
    }

    #[test]
    fn iso_time_part_is_dropped() {
        assert_eq!(
            normalize_date(Some("2023-10-15T09:30:00Z")).as_deref(),
            Some("2023-10-15")
        );
        assert_eq!(normalize_date(Some(" 2023-10-15 ")).as_deref(), Some("2023-10-15"));
    }

    #[test]
    fn missing_or_blank() {
        assert_eq!(normalize_date(None), None);
        assert_eq!(normalize_date(Some("  ")), None);
    }

    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    proptest! {
        #[test]
        fn valid_iso_dates_unchanged(y in 1900i32..2100, m in 1u32..=12, d in 1u32..=28) {
            let s = format!("{y:04}-{m:02}-{d:02}");
            prop_assert_eq!(normalize_date(Some(&s)), Some(s.clone()));
        }

        #[test]
        fn month_name_dates_become_iso(y in 1900i32..2100, m in 1usize..=12, d in 1u32..=28) {
            let s = format!("{} {:02}, {}", MONTHS[m - 1], d, y);
            prop_assert_eq!(normalize_date(Some(&s)), Some(format!("{y:04}-{m:02}-{d:02}")));
        }

        #[test]
        fn never_panics(s in "\\PC{0,40}") {
            let _ = normalize_date(Some(&s));
        }
    }
}
