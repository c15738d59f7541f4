use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// A local calendar day in canonical `YYYY-MM-DD` form.
///
/// Month and day are always zero-padded and the year is rendered with four
/// digits, so the derived `Ord` (plain string ordering) is chronological.
/// The only ways in are `from_ymd`, `from_naive` and `FromStr`, all of which
/// re-render the value canonically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarDateError {
    #[error("Invalid calendar date: {0}")]
    Invalid(String),
    #[error("Year {0} is outside the supported range 1000-9999")]
    YearOutOfRange(i32),
}

impl CalendarDate {
    /// Build a date from a year, a 1-based month and a day of month
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, CalendarDateError> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| CalendarDateError::Invalid(format!("{}-{}-{}", year, month, day)))?;
        Self::from_naive(date)
    }

    pub fn from_naive(date: NaiveDate) -> Result<Self, CalendarDateError> {
        // Four digit years keep the string fixed-width
        if !(1000..=9999).contains(&date.year()) {
            return Err(CalendarDateError::YearOutOfRange(date.year()));
        }
        Ok(Self(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_naive(&self) -> NaiveDate {
        // Constructors only accept valid dates, the fallback is unreachable
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").unwrap_or_default()
    }

    pub fn year(&self) -> i32 {
        self.to_naive().year()
    }

    /// 1-based month
    pub fn month(&self) -> u32 {
        self.to_naive().month()
    }

    pub fn day(&self) -> u32 {
        self.to_naive().day()
    }
}

impl FromStr for CalendarDate {
    type Err = CalendarDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map_err(|_| CalendarDateError::Invalid(trimmed.to_string()))?;
        Self::from_naive(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ymd_zero_pads() {
        let date = CalendarDate::from_ymd(2024, 3, 7).unwrap();
        assert_eq!(date.as_str(), "2024-03-07");
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 3);
        assert_eq!(date.day(), 7);
    }

    #[test]
    fn test_parse_rejects_invalid_dates() {
        assert!("2023-02-29".parse::<CalendarDate>().is_err());
        assert!("2023-13-01".parse::<CalendarDate>().is_err());
        assert!("not-a-date".parse::<CalendarDate>().is_err());
        assert!("".parse::<CalendarDate>().is_err());
    }

    #[test]
    fn test_parse_canonicalises_unpadded_input() {
        let date: CalendarDate = "2023-1-5".parse().unwrap();
        assert_eq!(date.as_str(), "2023-01-05");
    }

    #[test]
    fn test_out_of_range_year_is_rejected() {
        assert_eq!(
            CalendarDate::from_ymd(999, 1, 1),
            Err(CalendarDateError::YearOutOfRange(999))
        );
    }

    #[test]
    fn test_string_order_is_chronological() {
        let dates = [
            CalendarDate::from_ymd(2023, 12, 31).unwrap(),
            CalendarDate::from_ymd(2024, 1, 1).unwrap(),
            CalendarDate::from_ymd(2024, 1, 10).unwrap(),
            CalendarDate::from_ymd(2024, 2, 2).unwrap(),
            CalendarDate::from_ymd(2024, 10, 1).unwrap(),
        ];

        for pair in dates.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
            assert!(pair[0].to_naive() < pair[1].to_naive());
        }
    }
}
