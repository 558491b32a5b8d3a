//! Date text handling
//!
//! Transaction dates are stored as `DD/MM/YYYY` text. Ordering uses a
//! derived `YYYYMMDD` key that is never persisted.

use std::fmt;

use crate::error::{TallyError, TallyResult};

/// Width of a `DD/MM/YYYY` date
pub const DATE_TEXT_LEN: usize = 10;

/// Earliest year accepted when entering a transaction interactively
pub const MIN_ENTRY_YEAR: u32 = 2000;

/// Chronological comparison key: `year * 10000 + month * 100 + day`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(u32);

impl DateKey {
    /// Derive the key from `DD/MM/YYYY` text
    ///
    /// Fails with a format error unless the text is exactly ten characters
    /// with `/` at positions 2 and 5 and digits everywhere else.
    pub fn parse(text: &str) -> TallyResult<Self> {
        let (day, month, year) = split_date(text)?;
        Ok(Self(year * 10_000 + month * 100 + day))
    }

    /// The numeric key
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08}", self.0)
    }
}

/// Split `DD/MM/YYYY` into its `(day, month, year)` fields
pub fn split_date(text: &str) -> TallyResult<(u32, u32, u32)> {
    let bytes = text.as_bytes();
    if bytes.len() != DATE_TEXT_LEN {
        return Err(TallyError::Format(format!(
            "date '{}' must be {} characters (DD/MM/YYYY)",
            text, DATE_TEXT_LEN
        )));
    }
    if bytes[2] != b'/' || bytes[5] != b'/' {
        return Err(TallyError::Format(format!(
            "date '{}' must use '/' separators (DD/MM/YYYY)",
            text
        )));
    }

    let day = digits(text, &bytes[0..2])?;
    let month = digits(text, &bytes[3..5])?;
    let year = digits(text, &bytes[6..10])?;
    Ok((day, month, year))
}

/// The rule applied to dates typed at the prompt
///
/// Day 1-31, month 1-12, year 2000 or later. Day-of-month is not checked
/// against the month length.
pub fn is_valid_entry_date(text: &str) -> bool {
    match split_date(text) {
        Ok((day, month, year)) => {
            (1..=31).contains(&day) && (1..=12).contains(&month) && year >= MIN_ENTRY_YEAR
        }
        Err(_) => false,
    }
}

fn digits(text: &str, field: &[u8]) -> TallyResult<u32> {
    field.iter().try_fold(0u32, |acc, b| {
        if b.is_ascii_digit() {
            Ok(acc * 10 + u32::from(b - b'0'))
        } else {
            Err(TallyError::Format(format!(
                "date '{}' contains a non-digit field",
                text
            )))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key() {
        let key = DateKey::parse("15/03/2024").unwrap();
        assert_eq!(key.value(), 20240315);
        assert_eq!(key.to_string(), "20240315");
    }

    #[test]
    fn test_date_key_orders_chronologically() {
        let a = DateKey::parse("31/12/2023").unwrap();
        let b = DateKey::parse("01/01/2024").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_key_display_is_zero_padded() {
        let key = DateKey::parse("01/02/0099").unwrap();
        assert_eq!(key.to_string(), "00990201");
    }

    #[test]
    fn test_malformed_dates_fail_with_format_error() {
        for bad in ["", "1/3/2024", "15-03-2024", "15/03/24", "15/03/2024 ", "aa/03/2024", "15/03/20é"] {
            let err = DateKey::parse(bad).unwrap_err();
            assert!(err.is_format(), "{bad:?} gave {err}");
        }
    }

    #[test]
    fn test_entry_date_rule() {
        assert!(is_valid_entry_date("01/01/2000"));
        assert!(is_valid_entry_date("31/02/2024"));
        assert!(!is_valid_entry_date("00/01/2024"));
        assert!(!is_valid_entry_date("32/01/2024"));
        assert!(!is_valid_entry_date("10/13/2024"));
        assert!(!is_valid_entry_date("10/12/1999"));
        assert!(!is_valid_entry_date("2024-01-01"));
    }
}
