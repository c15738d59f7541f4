//! Date-range selection for the booking calendar.
//!
//! The selection is driven entirely by day clicks:
//!
//! - a click on a past day does nothing
//! - the first click sets the start date
//! - any later click on or after the start sets (or moves) the end date
//! - a click before the start is ignored; it does not restart the selection
//!
//! `clear` empties the selection at any time. Every comparison relies on the
//! ordering of `CalendarDate`, which is chronological.

use tracing::debug;

use crate::domain::models::CalendarDate;

/// Which edge of the selection a day sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

/// Classification of a rendered day. Exactly one applies to each day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayClassification {
    Past,
    SelectableEdge(Edge),
    BetweenEdges,
    Plain,
}

/// Why a click left the selection unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredClick {
    PastDay,
    BeforeStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    StartSelected,
    EndSelected,
    Ignored(IgnoredClick),
}

/// Start/end pair of the rental period.
///
/// Invariant: `end` is only ever set when `start` is, and `start <= end`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRange {
    start: Option<CalendarDate>,
    end: Option<CalendarDate>,
}

impl SelectionRange {
    pub fn start(&self) -> Option<&CalendarDate> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&CalendarDate> {
        self.end.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// Human readable period, e.g. "2023-12-16 - 2023-12-21"
    pub fn summary(&self) -> String {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => format!("{} - {}", start, end),
            (Some(start), None) => start.to_string(),
            _ => String::new(),
        }
    }
}

/// Owns the selection and applies click transitions to it
#[derive(Debug, Clone, Default)]
pub struct RangeSelector {
    range: SelectionRange,
}

impl RangeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(&self) -> &SelectionRange {
        &self.range
    }

    /// Apply a click on `date`. `is_past` is the day's classification as rendered.
    pub fn click(&mut self, date: CalendarDate, is_past: bool) -> ClickOutcome {
        if is_past {
            debug!("Ignoring click on past day {}", date);
            return ClickOutcome::Ignored(IgnoredClick::PastDay);
        }

        match &self.range.start {
            None => {
                debug!("Selection start set to {}", date);
                self.range.start = Some(date);
                ClickOutcome::StartSelected
            }
            Some(start) if *start <= date => {
                debug!("Selection end set to {}", date);
                self.range.end = Some(date);
                ClickOutcome::EndSelected
            }
            Some(start) => {
                debug!("Ignoring click on {} before selection start {}", date, start);
                ClickOutcome::Ignored(IgnoredClick::BeforeStart)
            }
        }
    }

    pub fn clear(&mut self) {
        self.range = SelectionRange::default();
    }

    /// Classify a day of the displayed month against today and this selection
    pub fn classify(
        &self,
        date: &CalendarDate,
        today_day: u32,
        is_current_month: bool,
    ) -> DayClassification {
        classify_day(date, today_day, is_current_month, &self.range)
    }
}

/// Classify one rendered day.
///
/// `is_current_month` is true when the displayed month is the month containing
/// today; only then are earlier days of the month `Past`.
pub fn classify_day(
    date: &CalendarDate,
    today_day: u32,
    is_current_month: bool,
    range: &SelectionRange,
) -> DayClassification {
    if is_current_month && date.day() < today_day {
        return DayClassification::Past;
    }

    let start = range.start.as_ref();
    let end = range.end.as_ref();

    if start == Some(date) {
        return DayClassification::SelectableEdge(Edge::Start);
    }
    if end == Some(date) {
        return DayClassification::SelectableEdge(Edge::End);
    }

    match (start, end) {
        (Some(start), Some(end)) if start < date && date < end => DayClassification::BetweenEdges,
        _ => DayClassification::Plain,
    }
}
