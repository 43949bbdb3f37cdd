//! Free-text date resolution for schedule cells.

use chrono::{Datelike, NaiveDate};

/// Formats for cells that carry a year, tried in order after the year-less one.
///
/// chrono's `%Y` takes any digit count, so the year is checked separately by
/// [`has_full_year`].
const DATED_FORMATS: &[&str] = &[
    // 3/14/2024
    "%m/%d/%Y",
    // Thursday, March 14, 2024
    "%A, %B %d, %Y",
    // March 14, 2024
    "%B %d, %Y",
];

/// Resolves date cells typed by hand into calendar dates.
///
/// `M/D` cells carry no year; they resolve to [`reference_year`](Self::reference_year),
/// which callers set to the calendar year of "today". A December sheet that
/// lists a `1/5` session therefore resolves it to January of the current year,
/// not the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateResolver {
    reference_year: i32,
}

impl DateResolver {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    /// Resolver whose year-less dates land in the year of `today`.
    pub fn for_day(today: NaiveDate) -> Self {
        Self::new(today.year())
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// First format that yields a valid calendar date wins.
    ///
    /// Blank or unrecognised text is "no date", not an error.
    pub fn resolve(&self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.resolve_month_day(text).or_else(|| {
            if !has_full_year(text) {
                return None;
            }
            DATED_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
    }

    fn resolve_month_day(&self, text: &str) -> Option<NaiveDate> {
        let (month, day) = text.split_once('/')?;
        let month: u32 = parse_digits(month)?;
        let day: u32 = parse_digits(day)?;
        NaiveDate::from_ymd_opt(self.reference_year, month, day)
    }
}

/// The text ends in a four-digit year (`3/14/2024`, `March 14, 2024`).
fn has_full_year(text: &str) -> bool {
    let year = text.rsplit(['/', ' ', ',']).next().unwrap_or_default();
    year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_day_uses_reference_year() {
        let resolver = DateResolver::new(2026);
        assert_eq!(resolver.resolve("3/14"), Some(ymd(2026, 3, 14)));
        assert_eq!(resolver.resolve(" 03/04 "), Some(ymd(2026, 3, 4)));
    }

    #[test]
    fn month_day_year() {
        let resolver = DateResolver::new(2026);
        assert_eq!(resolver.resolve("3/14/2024"), Some(ymd(2024, 3, 14)));
    }

    #[test]
    fn short_year_is_no_date() {
        let resolver = DateResolver::new(2026);
        assert_eq!(resolver.resolve("10/1/26"), None);
        assert_eq!(resolver.resolve("March 14, 24"), None);
        assert_eq!(resolver.resolve("3/14/02024"), None);
    }

    #[test]
    fn long_forms() {
        let resolver = DateResolver::new(2026);
        assert_eq!(resolver.resolve("Thursday, March 14, 2024"), Some(ymd(2024, 3, 14)));
        assert_eq!(resolver.resolve("March 14, 2024"), Some(ymd(2024, 3, 14)));
    }

    #[test]
    fn not_a_date() {
        let resolver = DateResolver::new(2026);
        assert_eq!(resolver.resolve("not a date"), None);
        assert_eq!(resolver.resolve(""), None);
        assert_eq!(resolver.resolve("TBD"), None);
    }

    #[test]
    fn impossible_dates_are_rejected() {
        let resolver = DateResolver::new(2026);
        assert_eq!(resolver.resolve("2/30"), None);
        assert_eq!(resolver.resolve("13/1"), None);
        assert_eq!(resolver.resolve("2/29/2026"), None);
    }

    #[test]
    fn leap_day_depends_on_reference_year() {
        assert_eq!(DateResolver::new(2024).resolve("2/29"), Some(ymd(2024, 2, 29)));
        assert_eq!(DateResolver::new(2026).resolve("2/29"), None);
    }

    #[test]
    fn for_day_takes_year_of_today() {
        assert_eq!(DateResolver::for_day(ymd(2027, 12, 31)).reference_year(), 2027);
    }
}
