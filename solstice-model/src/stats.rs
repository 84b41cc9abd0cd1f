use std::fmt;

/// Summary of the items currently on screen.
///
/// Recomputed wholesale on every publish; consumers never see a partially
/// updated value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AggregateStats {
    /// Rendered month range, e.g. `3月-5月 2024`; empty when no dates.
    pub date_range: String,
    /// Unique addresses in first-seen order, space separated.
    pub addresses: String,
    /// Number of visible items, with or without metadata.
    pub count: usize,
}

impl AggregateStats {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Calendar month; the day is irrelevant to the range display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

/// Earliest and latest month of a set of dates.
///
/// Displays with the gallery's month-unit suffix:
/// `3月 2024`, `3月-5月 2024`, `12月 2023-1月 2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSpan {
    pub start: YearMonth,
    pub end: YearMonth,
}

impl MonthSpan {
    pub const fn new(start: YearMonth, end: YearMonth) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for MonthSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = (self.start, self.end);
        if start.year != end.year {
            write!(
                f,
                "{}月 {}-{}月 {}",
                start.month, start.year, end.month, end.year
            )
        } else if start.month != end.month {
            write!(f, "{}月-{}月 {}", start.month, end.month, start.year)
        } else {
            write!(f, "{}月 {}", start.month, start.year)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_month_renders_once() {
        let span =
            MonthSpan::new(YearMonth::new(2024, 3), YearMonth::new(2024, 3));
        assert_eq!(span.to_string(), "3月 2024");
    }

    #[test]
    fn months_within_one_year() {
        let span =
            MonthSpan::new(YearMonth::new(2024, 3), YearMonth::new(2024, 5));
        assert_eq!(span.to_string(), "3月-5月 2024");
    }

    #[test]
    fn range_across_years() {
        let span =
            MonthSpan::new(YearMonth::new(2023, 12), YearMonth::new(2024, 1));
        assert_eq!(span.to_string(), "12月 2023-1月 2024");
    }

    #[test]
    fn default_stats_are_empty() {
        let stats = AggregateStats::empty();
        assert!(stats.is_empty());
        assert!(stats.date_range.is_empty());
        assert!(stats.addresses.is_empty());
    }
}
