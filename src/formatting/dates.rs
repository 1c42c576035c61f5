// src/formatting/dates.rs
//! Display formatting of publication dates.

use crate::error::AppError;
use crate::types::DisplayLocale;
use chrono::{DateTime, Datelike, FixedOffset};

const MONTHS_PT_BR: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

const MONTHS_EN_US: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Renders a publication timestamp as "dd Mon yyyy" in the given locale,
/// e.g. "19 Abr 2021".
///
/// The date is taken in the timestamp's own offset.
pub fn format_display_date(
    timestamp: Option<&str>,
    locale: DisplayLocale,
) -> Result<String, AppError> {
    let timestamp = timestamp
        .ok_or_else(|| AppError::InvalidDate("post has no publication date".to_string()))?;
    let date = parse_publication_timestamp(timestamp)?;

    Ok(format!(
        "{:02} {} {}",
        date.day(),
        month_abbreviation(date.month0() as usize, locale),
        date.year()
    ))
}

/// Parses RFC 3339 timestamps as well as the `+0000` offsets the content
/// API emits.
pub fn parse_publication_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, AppError> {
    let trimmed = raw.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map_err(|e| AppError::InvalidDate(format!("'{}' is not a timestamp: {}", raw, e)))
}

/// Month abbreviations of `locale`, January first.
pub fn month_abbreviations(locale: DisplayLocale) -> &'static [&'static str; 12] {
    match locale {
        DisplayLocale::PtBr => &MONTHS_PT_BR,
        DisplayLocale::EnUs => &MONTHS_EN_US,
    }
}

fn month_abbreviation(month0: usize, locale: DisplayLocale) -> &'static str {
    month_abbreviations(locale)[month0 % 12]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_api_timestamps_in_portuguese() {
        assert_eq!(
            format_display_date(Some("2021-04-19T19:25:28+0000"), DisplayLocale::PtBr).unwrap(),
            "19 Abr 2021"
        );
        assert_eq!(
            format_display_date(Some("2021-03-05T10:00:00+0000"), DisplayLocale::PtBr).unwrap(),
            "05 Mar 2021"
        );
    }

    #[test]
    fn formats_rfc3339_in_english() {
        assert_eq!(
            format_display_date(Some("2020-02-01T08:00:00.123Z"), DisplayLocale::EnUs).unwrap(),
            "01 Feb 2020"
        );
        assert_eq!(
            format_display_date(Some("2021-08-31T23:30:00-03:00"), DisplayLocale::EnUs).unwrap(),
            "31 Aug 2021"
        );
    }

    #[test]
    fn missing_or_garbled_dates_are_invalid() {
        assert!(matches!(
            format_display_date(None, DisplayLocale::PtBr),
            Err(AppError::InvalidDate(_))
        ));
        assert!(matches!(
            format_display_date(Some("ontem"), DisplayLocale::PtBr),
            Err(AppError::InvalidDate(_))
        ));
    }

    #[test]
    fn parses_fractional_seconds_with_compact_offset() {
        let parsed = parse_publication_timestamp("2021-04-19T19:25:28.512+0000").unwrap();
        assert_eq!(parsed.day(), 19);
    }
}
