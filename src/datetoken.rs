//! Date token parsing.
//!
//! Inbound requests name a daily partition with an 8-character MMDDYYYY
//! token. Parsing only decomposes the token into its numeric parts;
//! calendar validity of the month is the resolver's concern, and the day
//! and year are accepted as-is.

use thiserror::Error;

/// Decomposed date token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub day: u32,
    pub month: u32,
    pub year: u32,
}

/// Errors rejecting a date token before any store access happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid date given - expected 8 digits in MMDDYYYY format, got {0} characters")]
    BadLength(usize),

    #[error("invalid month format in date: {0:?}")]
    BadMonth(String),

    #[error("invalid day format in date: {0:?}")]
    BadDay(String),

    #[error("invalid year format in date: {0:?}")]
    BadYear(String),
}

/// Split an MMDDYYYY token into month [0:2), day [2:4) and year [4:8).
///
/// Pure function; the caller decides what to do with the parts.
pub fn parse(token: &str) -> Result<DateParts, ParseError> {
    if token.len() != 8 {
        return Err(ParseError::BadLength(token.chars().count()));
    }

    // Length is in bytes; multi-byte characters can still break the
    // slice boundaries, so slicing goes through get().
    let month_str = token.get(0..2).unwrap_or_default();
    let day_str = token.get(2..4).unwrap_or_default();
    let year_str = token.get(4..8).unwrap_or_default();

    let month = month_str
        .parse::<u32>()
        .map_err(|_| ParseError::BadMonth(month_str.to_string()))?;
    let day = day_str
        .parse::<u32>()
        .map_err(|_| ParseError::BadDay(day_str.to_string()))?;
    let year = year_str
        .parse::<u32>()
        .map_err(|_| ParseError::BadYear(year_str.to_string()))?;

    Ok(DateParts { day, month, year })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_token() {
        let parts = parse("06302025").unwrap();
        assert_eq!(
            parts,
            DateParts {
                day: 30,
                month: 6,
                year: 2025
            }
        );
    }

    #[test]
    fn parse_is_deterministic() {
        assert_eq!(parse("06212025").unwrap(), parse("06212025").unwrap());
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(parse("0630202"), Err(ParseError::BadLength(7)));
        assert_eq!(parse("063020255"), Err(ParseError::BadLength(9)));
        assert_eq!(parse(""), Err(ParseError::BadLength(0)));
    }

    #[test]
    fn rejects_non_numeric_slices() {
        assert_eq!(
            parse("ab302025"),
            Err(ParseError::BadMonth("ab".to_string()))
        );
        assert_eq!(parse("06xx2025"), Err(ParseError::BadDay("xx".to_string())));
        assert_eq!(
            parse("0630year"),
            Err(ParseError::BadYear("year".to_string()))
        );
    }

    #[test]
    fn rejects_negative_slices() {
        assert_eq!(parse("06-12025"), Err(ParseError::BadDay("-1".to_string())));
    }

    #[test]
    fn day_and_year_are_not_range_checked() {
        // Partition existence is the store's concern; day 99 parses fine.
        let parts = parse("02990025").unwrap();
        assert_eq!(parts.day, 99);
        assert_eq!(parts.year, 25);
    }

    #[test]
    fn eight_bytes_of_multibyte_text_is_not_a_panic() {
        // Four 2-byte characters pass the length check but fail slicing.
        let err = parse("éééé").unwrap_err();
        assert!(matches!(err, ParseError::BadMonth(_)));
    }
}
