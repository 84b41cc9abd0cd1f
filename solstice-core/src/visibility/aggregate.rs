//! Summary computation over the visible subset.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use solstice_model::{AggregateStats, ItemMetadata, MonthSpan, YearMonth};
use tracing::debug;

const MONTH_FORMAT: &str = "%Y-%m-%d";

/// Build the summary for the given visible items.
///
/// Only the year and month of a date matter. Dates that are not zero-padded
/// `YYYY-MM-DD` with a month in 1..=12 are left out of the range; the item
/// itself still counts and still contributes its address.
pub fn aggregate<'a, I>(visible: I) -> AggregateStats
where
    I: IntoIterator<Item = &'a ItemMetadata>,
{
    let mut count = 0usize;
    let mut earliest: Option<YearMonth> = None;
    let mut latest: Option<YearMonth> = None;
    let mut seen: HashSet<&str> = HashSet::new();
    let mut addresses: Vec<&str> = Vec::new();

    for meta in visible {
        count += 1;

        if let Some(raw) = meta.date() {
            match parse_year_month(raw) {
                Some(month) => {
                    earliest = Some(earliest.map_or(month, |m| m.min(month)));
                    latest = Some(latest.map_or(month, |m| m.max(month)));
                }
                None => {
                    debug!(date = raw, "skipping malformed item date");
                }
            }
        }

        if let Some(address) = meta.address()
            && seen.insert(address)
        {
            addresses.push(address);
        }
    }

    if count == 0 {
        return AggregateStats::empty();
    }

    let date_range = match (earliest, latest) {
        (Some(start), Some(end)) => {
            MonthSpan::new(start, end).to_string()
        }
        _ => String::new(),
    };

    AggregateStats {
        date_range,
        addresses: addresses.join(" "),
        count,
    }
}

/// `YYYY-MM-DD` with every field zero-padded. The day is checked for shape
/// only, so `2024-02-30` still lands in February.
fn parse_year_month(raw: &str) -> Option<YearMonth> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }

    let first_of_month = format!("{}-01", &raw[..7]);
    let date = NaiveDate::parse_from_str(&first_of_month, MONTH_FORMAT).ok()?;
    Some(YearMonth::new(date.year(), date.month()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(date: &str) -> ItemMetadata {
        ItemMetadata::new().with_date(date)
    }

    fn placed(address: &str) -> ItemMetadata {
        ItemMetadata::new().with_address(address)
    }

    #[test]
    fn nothing_visible_is_empty() {
        assert_eq!(aggregate(&[] as &[ItemMetadata]), AggregateStats::empty());
    }

    #[test]
    fn dates_in_same_month() {
        let items = [dated("2024-03-15"), dated("2024-03-01")];
        assert_eq!(aggregate(&items).date_range, "3月 2024");
    }

    #[test]
    fn dates_across_months() {
        let items = [dated("2024-05-01"), dated("2024-03-01")];
        assert_eq!(aggregate(&items).date_range, "3月-5月 2024");
    }

    #[test]
    fn dates_across_years() {
        let items = [dated("2024-01-01"), dated("2023-12-01")];
        assert_eq!(aggregate(&items).date_range, "12月 2023-1月 2024");
    }

    #[test]
    fn addresses_deduplicate_in_first_seen_order() {
        let items = [placed("A St"), placed("A St"), placed("B Ave")];
        let stats = aggregate(&items);
        assert_eq!(stats.addresses, "A St B Ave");
        assert_eq!(stats.count, 3);
        assert!(stats.date_range.is_empty());
    }

    #[test]
    fn items_without_metadata_still_count() {
        let items = [ItemMetadata::new(), dated("2022-07-04")];
        let stats = aggregate(&items);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.date_range, "7月 2022");
        assert!(stats.addresses.is_empty());
    }

    #[test]
    fn malformed_dates_are_skipped() {
        let items = [
            dated("yesterday"),
            dated("2024-13-01"),
            dated("2024-02-10").with_address("Harbor"),
        ];
        let stats = aggregate(&items);
        assert_eq!(stats.date_range, "2月 2024");
        assert_eq!(stats.addresses, "Harbor");
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn day_is_not_calendar_checked() {
        let items = [dated("2024-02-30")];
        assert_eq!(aggregate(&items).date_range, "2月 2024");
    }

    #[test]
    fn unpadded_dates_are_skipped() {
        let items = [dated("2024-3-5"), dated("2024-10-01")];
        let stats = aggregate(&items);
        assert_eq!(stats.date_range, "10月 2024");
        assert_eq!(stats.count, 2);
    }

    #[test]
    fn month_out_of_range_is_skipped() {
        assert_eq!(parse_year_month("2024-00-10"), None);
        assert_eq!(parse_year_month("2024-12-99"), Some(YearMonth::new(2024, 12)));
        assert_eq!(parse_year_month("２０２４-01-01"), None);
    }

    #[test]
    fn only_malformed_dates_leave_range_empty() {
        let items = [dated("not-a-date")];
        let stats = aggregate(&items);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.date_range, "");
    }
}
