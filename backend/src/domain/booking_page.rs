//! State of one booking page.
//!
//! `BookingPage` is the explicit page state: the bike being booked, the user,
//! the calendar cursor, the range selector and the submission state machine.
//! All mutations are plain methods; `view` derives everything a frontend
//! draws (day grid, classifications, quote) from the current state, so the
//! derived values can never lag behind the state that produced them.

use chrono::{Datelike, NaiveDate};
use shared::{
    Bike, BookingCalendarDay, BookingCalendarMonth, BookingPageView, DayClickResult, DayKind,
    RentData, SelectionSummary,
};
use uuid::Uuid;

use crate::domain::booking::{BookingSubmission, RentOutcome, SubmissionError};
use crate::domain::calendar::{CalendarCursor, CalendarError};
use crate::domain::pricing::{PricingCalculator, PricingError};
use crate::domain::range_selection::{
    ClickOutcome, DayClassification, Edge, IgnoredClick, RangeSelector,
};

const CONFIRMATION_MESSAGE: &str = "Thank you! Your bike is booked.";

/// Why a page could not be rendered
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

#[derive(Debug, Clone)]
pub struct BookingPage {
    session_id: Uuid,
    bike: Bike,
    user_id: String,
    cursor: CalendarCursor,
    selector: RangeSelector,
    submission: BookingSubmission,
}

impl BookingPage {
    pub fn new(session_id: Uuid, bike: Bike, user_id: String, today: NaiveDate) -> Self {
        Self {
            session_id,
            bike,
            user_id,
            cursor: CalendarCursor::starting_at(today),
            selector: RangeSelector::new(),
            submission: BookingSubmission::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn bike(&self) -> &Bike {
        &self.bike
    }

    pub fn cursor(&self) -> &CalendarCursor {
        &self.cursor
    }

    pub fn selector(&self) -> &RangeSelector {
        &self.selector
    }

    pub fn submission(&self) -> &BookingSubmission {
        &self.submission
    }

    pub fn previous_month(&mut self, today: NaiveDate) -> bool {
        self.cursor.previous_month(today)
    }

    /// Step forward unless the next month has no representable dates
    pub fn next_month(&mut self) -> Result<(), CalendarError> {
        let mut next = self.cursor;
        next.next_month();
        next.date_for(1)?;
        self.cursor = next;
        Ok(())
    }

    /// Click a day of the displayed month
    pub fn click_day(&mut self, day: u32, today: NaiveDate) -> Result<DayClickResult, CalendarError> {
        let date = self.cursor.date_for(day)?;

        if self.submission.is_confirmed() {
            return Ok(DayClickResult::IgnoredConfirmed);
        }

        let is_past = self.classify(day, today)? == DayClassification::Past;
        let result = match self.selector.click(date, is_past) {
            ClickOutcome::StartSelected => DayClickResult::StartSelected,
            ClickOutcome::EndSelected => DayClickResult::EndSelected,
            ClickOutcome::Ignored(IgnoredClick::PastDay) => DayClickResult::IgnoredPastDay,
            ClickOutcome::Ignored(IgnoredClick::BeforeStart) => DayClickResult::IgnoredBeforeStart,
        };
        Ok(result)
    }

    pub fn clear_selection(&mut self) {
        self.selector.clear();
    }

    fn classify(&self, day: u32, today: NaiveDate) -> Result<DayClassification, CalendarError> {
        let date = self.cursor.date_for(day)?;
        Ok(self
            .selector
            .classify(&date, today.day(), self.cursor.is_current_month(today)))
    }

    pub fn begin_submission(&mut self) -> Result<RentData, SubmissionError> {
        self.submission
            .begin(self.selector.range(), Some(self.bike.id.as_str()), &self.user_id)
    }

    pub fn complete_submission(&mut self, outcome: &RentOutcome) {
        self.submission.complete(outcome);
    }

    /// Render the page for `today`
    pub fn view(&self, today: NaiveDate, pricing: &PricingCalculator) -> Result<BookingPageView, ViewError> {
        let range = self.selector.range();
        let quote = pricing.quote(self.bike.rate, range)?;

        let is_current_month = self.cursor.is_current_month(today);
        let days = self
            .cursor
            .list_days()
            .map(|day| {
                let date = self.cursor.date_for(day)?;
                let kind = day_kind(self.selector.classify(&date, today.day(), is_current_month));
                Ok(BookingCalendarDay {
                    day,
                    date: date.to_string(),
                    kind,
                })
            })
            .collect::<Result<Vec<_>, CalendarError>>()?;

        let calendar = BookingCalendarMonth {
            year: self.cursor.year(),
            month: self.cursor.month(),
            month_name: self.cursor.month_name().to_string(),
            can_navigate_previous: self.cursor.can_go_previous(today),
            days,
        };

        let selection = SelectionSummary {
            start: range.start().map(ToString::to_string),
            end: range.end().map(ToString::to_string),
            label: range.summary(),
        };

        Ok(BookingPageView {
            session_id: self.session_id,
            user_id: self.user_id.clone(),
            bike: self.bike.clone(),
            calendar,
            selection,
            quote,
            status: self.submission.status(),
            last_failure: self.submission.last_failure().cloned(),
            can_submit: self.submission.can_submit(range),
            confirmation_message: self
                .submission
                .is_confirmed()
                .then(|| CONFIRMATION_MESSAGE.to_string()),
        })
    }
}

fn day_kind(classification: DayClassification) -> DayKind {
    match classification {
        DayClassification::Past => DayKind::Past,
        DayClassification::SelectableEdge(Edge::Start) => DayKind::Start,
        DayClassification::SelectableEdge(Edge::End) => DayKind::End,
        DayClassification::BetweenEdges => DayKind::BetweenEdges,
        DayClassification::Plain => DayKind::Plain,
    }
}
