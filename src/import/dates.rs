//! Date coercion for imported staff rows.
//!
//! Spreadsheets hand us dates as decoded values, as day serials or as text in
//! whatever format the author typed. [`parse_import_date`] is the single
//! entry point; anything it cannot place on a calendar between 1900 and 2100
//! comes back as `None` and the field is left out of the row.

use chrono::{DateTime, Datelike as _, Days, NaiveDate, NaiveDateTime};

use super::Cell;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Last serial that still lands on a representable four digit year.
const MAX_SERIAL: f64 = 2_958_465.0;

/// Formats tried once nothing more specific matched.
const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%a %b %d %Y",
];

const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub fn parse_import_date(cell: &Cell) -> Option<NaiveDate> {
    let date = match cell {
        Cell::Date(value) => value.date(),
        Cell::Number(serial) => serial_to_date(*serial)?,
        Cell::Text(text) => parse_date_text(text.trim())?,
        Cell::Empty | Cell::Bool(_) => return None,
    };

    (MIN_YEAR..=MAX_YEAR).contains(&date.year()).then_some(date)
}

/// Converts a spreadsheet day serial, where serial 1 is 1900-01-01.
///
/// Serial 60 stands for 1900-02-29, a day that never existed, so every
/// serial from 60 on is shifted back by one. Any time of day is dropped.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }

    let mut days = serial.trunc() as u64;
    if days >= 60 {
        days -= 1;
    }

    NaiveDate::from_ymd_opt(1899, 12, 31)?.checked_add_days(Days::new(days))
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    if let Some(date) = parse_iso(text) {
        return date;
    }

    if let Some(date) = parse_day_month_year(text) {
        return date;
    }

    parse_fallback(text)
}

/// `YYYY-MM-DD`, taken literally. The outer `None` means the text has a
/// different shape; `Some(None)` means it has this shape but no such day.
fn parse_iso(text: &str) -> Option<Option<NaiveDate>> {
    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes.iter().enumerate().all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !shaped {
        return None;
    }

    let year = text[0..4].parse().ok()?;
    let month = text[5..7].parse().ok()?;
    let day = text[8..10].parse().ok()?;

    Some(NaiveDate::from_ymd_opt(year, month, day))
}

/// `A/B/YYYY` (also with `-` or `.`), where it is not known up front which of
/// `A` and `B` is the day. Same return convention as [`parse_iso`].
fn parse_day_month_year(text: &str) -> Option<Option<NaiveDate>> {
    let separator = text.chars().find(|c| matches!(c, '/' | '-' | '.'))?;

    let mut parts = text.split(separator);
    let (a, b, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let numeric = |part: &str, len: std::ops::RangeInclusive<usize>| {
        len.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    };
    if !(numeric(a, 1..=2) && numeric(b, 1..=2) && numeric(year, 4..=4)) {
        return None;
    }

    Some(resolve_day_month(a.parse().ok()?, b.parse().ok()?, year.parse().ok()?))
}

/// A value above 12 can only be the day. When both fit a month the day comes
/// first, and month first is tried only if that does not form a real date.
fn resolve_day_month(a: u32, b: u32, year: i32) -> Option<NaiveDate> {
    match (a > 12, b > 12) {
        (true, true) => None,
        (true, false) => NaiveDate::from_ymd_opt(year, b, a),
        (false, true) => NaiveDate::from_ymd_opt(year, a, b),
        (false, false) => NaiveDate::from_ymd_opt(year, b, a)
            .or_else(|| NaiveDate::from_ymd_opt(year, a, b)),
    }
}

fn parse_fallback(text: &str) -> Option<NaiveDate> {
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Some(value.date_naive());
    }

    if let Ok(value) = DateTime::parse_from_rfc2822(text) {
        return Some(value.date_naive());
    }

    FALLBACK_DATE_FORMATS.iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| FALLBACK_DATETIME_FORMATS.iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .map(|value| value.date()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn text(value: &str) -> Option<NaiveDate> {
        parse_import_date(&Cell::Text(value.to_owned()))
    }

    #[test]
    fn test_serial_to_date() {
        assert_eq!(serial_to_date(45292.0), ymd(2024, 1, 1));
        assert_eq!(serial_to_date(1.0), ymd(1900, 1, 1));
        assert_eq!(serial_to_date(59.0), ymd(1900, 2, 28));
        assert_eq!(serial_to_date(61.0), ymd(1900, 3, 1));
        assert_eq!(serial_to_date(45351.0), ymd(2024, 2, 29));
        assert_eq!(serial_to_date(45292.75), ymd(2024, 1, 1));
    }

    #[test]
    fn test_serial_out_of_range() {
        assert_eq!(serial_to_date(0.0), None);
        assert_eq!(serial_to_date(-5.0), None);
        assert_eq!(serial_to_date(f64::NAN), None);
        assert_eq!(serial_to_date(f64::INFINITY), None);
        // 2101-01-01
        assert_eq!(parse_import_date(&Cell::Number(73416.0)), None);
        assert_eq!(parse_import_date(&Cell::Number(73415.0)), ymd(2100, 12, 31));
    }

    #[test]
    fn test_native_date_is_taken_as_is() {
        let value = NaiveDate::from_ymd_opt(1985, 7, 14).unwrap().and_hms_opt(23, 59, 0).unwrap();

        assert_eq!(parse_import_date(&Cell::Date(value)), ymd(1985, 7, 14));
    }

    #[test]
    fn test_iso() {
        assert_eq!(text("2024-01-31"), ymd(2024, 1, 31));
        assert_eq!(text(" 1999-12-05 "), ymd(1999, 12, 5));
        assert_eq!(text("2024-02-29"), ymd(2024, 2, 29));
        assert_eq!(text("2023-02-29"), None);
        assert_eq!(text("2024-13-01"), None);
    }

    #[test]
    fn test_first_part_above_twelve_is_the_day() {
        assert_eq!(text("25/12/2023"), ymd(2023, 12, 25));
        assert_eq!(text("13/01/2024"), ymd(2024, 1, 13));
    }

    #[test]
    fn test_second_part_above_twelve_is_the_day() {
        assert_eq!(text("12/25/2023"), ymd(2023, 12, 25));
        assert_eq!(text("2/29/2024"), ymd(2024, 2, 29));
    }

    #[test]
    fn test_ambiguous_prefers_day_first() {
        assert_eq!(text("05/06/2024"), ymd(2024, 6, 5));
        assert_eq!(text("1/2/2024"), ymd(2024, 2, 1));
        assert_eq!(text("12/12/2024"), ymd(2024, 12, 12));
    }

    #[test]
    fn test_both_parts_above_twelve() {
        assert_eq!(text("13/13/2024"), None);
        assert_eq!(text("31/31/2024"), None);
    }

    #[test]
    fn test_impossible_days_are_dropped() {
        assert_eq!(text("15/13/2024"), None);
        assert_eq!(text("32/01/2024"), None);
        assert_eq!(text("30/02/2024"), None);
        assert_eq!(text("29/02/2023"), None);
        assert_eq!(text("0/05/2024"), None);
    }

    #[test]
    fn test_leap_years() {
        assert_eq!(text("29/02/2024"), ymd(2024, 2, 29));
        assert_eq!(text("29/02/2000"), ymd(2000, 2, 29));
        assert_eq!(text("29/02/1900"), None);
        assert_eq!(text("02/29/2100"), None);
    }

    #[test]
    fn test_other_separators() {
        assert_eq!(text("14-08-1990"), ymd(1990, 8, 14));
        assert_eq!(text("14.08.1990"), ymd(1990, 8, 14));
    }

    #[test]
    fn test_year_range() {
        assert_eq!(text("31/12/1899"), None);
        assert_eq!(text("01/01/1900"), ymd(1900, 1, 1));
        assert_eq!(text("31/12/2100"), ymd(2100, 12, 31));
        assert_eq!(text("2101-01-01"), None);
    }

    #[test]
    fn test_fallback_formats() {
        assert_eq!(text("2024/03/09"), ymd(2024, 3, 9));
        assert_eq!(text("2024-1-5"), ymd(2024, 1, 5));
        assert_eq!(text("2024-3-09"), ymd(2024, 3, 9));
        assert_eq!(text("9 Mar 2024"), ymd(2024, 3, 9));
        assert_eq!(text("09-Mar-2024"), ymd(2024, 3, 9));
        assert_eq!(text("March 9, 2024"), ymd(2024, 3, 9));
        assert_eq!(text("2024-03-09T18:30:00"), ymd(2024, 3, 9));
        assert_eq!(text("2024-03-09T23:30:00+05:30"), ymd(2024, 3, 9));
    }

    #[test]
    fn test_unparseable_text() {
        assert_eq!(text("yesterday"), None);
        assert_eq!(text("45292"), None);
        assert_eq!(text("05/06/24"), None);
        assert_eq!(text(""), None);
        assert_eq!(parse_import_date(&Cell::Bool(true)), None);
        assert_eq!(parse_import_date(&Cell::Empty), None);
    }
}
