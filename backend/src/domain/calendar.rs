//! Calendar cursor for the booking page.
//!
//! The cursor is the (year, month) pair the date picker currently shows. It is
//! independent of the selected rental period: navigating never touches the
//! selection. Months are 0-based here (0 = January) to match the wire format
//! the booking calendar uses.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::domain::models::{CalendarDate, CalendarDateError};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("Day {day} is not in the displayed month ({days_in_month} days)")]
    DayOutOfRange { day: u32, days_in_month: u32 },
    #[error("Month {0} is out of range (expected 0-11)")]
    MonthOutOfRange(u32),
    #[error(transparent)]
    InvalidDate(#[from] CalendarDateError),
}

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in a 0-based month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 => if is_leap_year(year) { 29 } else { 28 },
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// English name of a 0-based month
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES.get(month as usize).copied().unwrap_or("Invalid Month")
}

/// The (year, month) pair currently displayed by the date picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CalendarCursor {
    // Field order matters for the derived Ord: year first, then month
    year: i32,
    month: u32,
}

impl CalendarCursor {
    /// Cursor pointing at the month containing `today`
    pub fn starting_at(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            month: today.month0(),
        }
    }

    /// Cursor at an explicit position, `month` is 0-based
    pub fn at(year: i32, month: u32) -> Result<Self, CalendarError> {
        if month > 11 {
            return Err(CalendarError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 0 = January, 11 = December
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// Days of the displayed month, 1..=days_in_month
    pub fn list_days(&self) -> impl Iterator<Item = u32> {
        1..=self.days_in_month()
    }

    /// True when the cursor is strictly before the month containing `today`
    pub fn is_past_month(&self, today: NaiveDate) -> bool {
        *self < Self::starting_at(today)
    }

    /// True when the cursor shows the month containing `today`.
    ///
    /// Only in that month are days before today classified as past; days of
    /// earlier months are never flagged.
    pub fn is_current_month(&self, today: NaiveDate) -> bool {
        *self == Self::starting_at(today)
    }

    fn previous(&self) -> Self {
        if self.month > 0 {
            Self { year: self.year, month: self.month - 1 }
        } else {
            Self { year: self.year - 1, month: 11 }
        }
    }

    fn next(&self) -> Self {
        if self.month < 11 {
            Self { year: self.year, month: self.month + 1 }
        } else {
            Self { year: self.year + 1, month: 0 }
        }
    }

    /// Whether the "previous month" control is enabled
    pub fn can_go_previous(&self, today: NaiveDate) -> bool {
        !self.previous().is_past_month(today)
    }

    /// Step back one month unless that would land before today's month.
    /// Returns whether the cursor moved.
    pub fn previous_month(&mut self, today: NaiveDate) -> bool {
        if !self.can_go_previous(today) {
            debug!("Ignoring previous month from {} {}", self.month_name(), self.year);
            return false;
        }
        *self = self.previous();
        true
    }

    /// Step forward one month. There is no upper bound.
    pub fn next_month(&mut self) {
        *self = self.next();
    }

    /// Canonical date of a day in the displayed month
    pub fn date_for(&self, day: u32) -> Result<CalendarDate, CalendarError> {
        let days_in_month = self.days_in_month();
        if day == 0 || day > days_in_month {
            return Err(CalendarError::DayOutOfRange { day, days_in_month });
        }
        Ok(CalendarDate::from_ymd(self.year, self.month + 1, day)?)
    }
}
