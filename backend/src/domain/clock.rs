//! Source of "today" for the booking engine.
//!
//! All calendar rules compare against the local calendar date. Tests pin it
//! with `FixedClock` so the day classification is deterministic.

use chrono::{Local, NaiveDate};

pub trait Clock: Send + Sync {
    /// Today's local calendar date
    fn today(&self) -> NaiveDate;
}

/// Reads the host's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}
