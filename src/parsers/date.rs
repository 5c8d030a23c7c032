use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());

static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+([a-z]{3,9})\.?,?\s+(\d{4})\b").unwrap()
});

static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b").unwrap()
});

static NUMERIC_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[./](\d{1,2})[./](\d{4})\b").unwrap());

static MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{4})\b").unwrap());

static TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").unwrap());

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parses a human-readable publication date such as `"Published 12 March 2024"`.
///
/// The date may be embedded in other text. Numeric dates are read day first.
/// A month without a day resolves to the first of the month. A `HH:MM` time,
/// if present, is applied; otherwise the result is at midnight.
pub fn parse_publication_date(text: &str) -> Option<NaiveDateTime> {
    let date = find_date(text)?;
    let time = find_time(text).unwrap_or(NaiveTime::MIN);
    Some(date.and_time(time))
}

fn find_date(text: &str) -> Option<NaiveDate> {
    first_match(&ISO_DATE, text, |c| {
        ymd(num(c, 1)?, num(c, 2)?, num(c, 3)?)
    })
    .or_else(|| {
        first_match(&DAY_MONTH_YEAR, text, |c| {
            ymd(num(c, 3)?, month_from_name(&c[2])?, num(c, 1)?)
        })
    })
    .or_else(|| {
        first_match(&MONTH_DAY_YEAR, text, |c| {
            ymd(num(c, 3)?, month_from_name(&c[1])?, num(c, 2)?)
        })
    })
    .or_else(|| {
        first_match(&NUMERIC_DATE, text, |c| {
            ymd(num(c, 3)?, num(c, 2)?, num(c, 1)?)
        })
    })
    .or_else(|| {
        first_match(&MONTH_YEAR, text, |c| {
            ymd(num(c, 2)?, month_from_name(&c[1])?, 1)
        })
    })
}

fn find_time(text: &str) -> Option<NaiveTime> {
    first_match(&TIME_OF_DAY, text, |c| {
        NaiveTime::from_hms_opt(num(c, 1)?, num(c, 2)?, 0)
    })
}

/// Returns the first candidate match that converts to a value
fn first_match<T>(
    regex: &Regex,
    text: &str,
    convert: impl Fn(&Captures<'_>) -> Option<T>,
) -> Option<T> {
    regex.captures_iter(text).find_map(|c| convert(&c))
}

fn num<T: std::str::FromStr>(captures: &Captures<'_>, group: usize) -> Option<T> {
    captures.get(group)?.as_str().parse().ok()
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Accepts full names and abbreviations of at least three letters ("Sep", "Sept")
fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .position(|month| month.starts_with(&name))
        .map(|index| index as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_day_month_year() {
        assert_eq!(parse_publication_date("12 March 2024"), Some(date(2024, 3, 12)));
        assert_eq!(parse_publication_date("1st Sept 2023"), Some(date(2023, 9, 1)));
        assert_eq!(parse_publication_date("05 dec. 2022"), Some(date(2022, 12, 5)));
    }

    #[test]
    fn test_month_day_year() {
        assert_eq!(parse_publication_date("March 12, 2024"), Some(date(2024, 3, 12)));
        assert_eq!(parse_publication_date("Jan 22nd 2021"), Some(date(2021, 1, 22)));
    }

    #[test]
    fn test_numeric_formats() {
        assert_eq!(parse_publication_date("2024-03-12"), Some(date(2024, 3, 12)));
        assert_eq!(parse_publication_date("12/03/2024"), Some(date(2024, 3, 12)));
        assert_eq!(parse_publication_date("12.03.2024"), Some(date(2024, 3, 12)));
    }

    #[test]
    fn test_month_only() {
        assert_eq!(parse_publication_date("November 2020"), Some(date(2020, 11, 1)));
    }

    #[test]
    fn test_embedded_in_text() {
        assert_eq!(
            parse_publication_date("Published on 7 June 2019"),
            Some(date(2019, 6, 7))
        );
        // "Published" looks like a month name candidate and must be skipped
        assert_eq!(parse_publication_date("Published 2019 June 2019"), Some(date(2019, 6, 1)));
    }

    #[test]
    fn test_time_of_day() {
        let parsed = parse_publication_date("12 March 2024 14:30").unwrap();
        assert_eq!(parsed, date(2024, 3, 12).date().and_hms_opt(14, 30, 0).unwrap());
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_publication_date(""), None);
        assert_eq!(parse_publication_date("coming soon"), None);
        assert_eq!(parse_publication_date("13/13/2024"), None);
    }
}
