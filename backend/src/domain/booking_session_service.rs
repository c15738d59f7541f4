//! Booking session service.
//!
//! Owns every live `BookingPage`, keyed by session id. Page mutations happen
//! under a single mutex and the returned view is rendered under the same lock,
//! so a view always reflects the mutation that produced it.
//!
//! Submitting releases the lock while the rental request is in flight. The
//! page is marked `Submitting` first, which is what keeps a second submit
//! from going out for the same page. If the submit future is dropped before
//! the rental desk answers, the page goes back to `Selecting` with an unknown
//! failure.
//!
//! Sessions idle for longer than the idle timeout are evicted whenever a new
//! session is opened. Pages with a request in flight are never evicted or
//! closed.

use chrono::NaiveDate;
use shared::{
    BookingPageView, DayClickResponse, SubmissionStatus, SubmitBookingResponse, SubmitOutcome,
    RENT_PATH,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::bike_catalog::BikeCatalog;
use crate::domain::booking::{RentOutcome, RentalRequester, SubmissionError};
use crate::domain::booking_page::{BookingPage, ViewError};
use crate::domain::calendar::CalendarError;
use crate::domain::clock::Clock;
use crate::domain::pricing::{PricingCalculator, PricingError};

pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Booking session {0} not found")]
    SessionNotFound(Uuid),
    #[error("Bike {0} not found")]
    BikeNotFound(String),
    #[error("A user id is required")]
    MissingUserId,
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl From<ViewError> for BookingError {
    fn from(e: ViewError) -> Self {
        match e {
            ViewError::Calendar(e) => Self::Calendar(e),
            ViewError::Pricing(e) => Self::Pricing(e),
        }
    }
}

struct SessionEntry {
    page: BookingPage,
    last_touched: Instant,
}

impl SessionEntry {
    fn is_submitting(&self) -> bool {
        self.page.submission().status() == SubmissionStatus::Submitting
    }
}

type Sessions = Arc<Mutex<HashMap<Uuid, SessionEntry>>>;

fn lock(sessions: &Sessions) -> MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
    sessions.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Held while a rental request is in flight. Dropping it unsettled puts the
/// page back to `Selecting`.
struct PendingSubmission {
    sessions: Sessions,
    session_id: Uuid,
    settled: bool,
}

impl PendingSubmission {
    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for PendingSubmission {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("Submission for session {} was cancelled before the rental desk answered", self.session_id);
        if let Some(entry) = lock(&self.sessions).get_mut(&self.session_id) {
            entry.page.complete_submission(&RentOutcome::Unknown {
                status: None,
                detail: "Submission cancelled".to_string(),
            });
        }
    }
}

#[derive(Clone)]
pub struct BookingSessionService {
    sessions: Sessions,
    catalog: Arc<dyn BikeCatalog>,
    requester: Arc<dyn RentalRequester>,
    clock: Arc<dyn Clock>,
    pricing: PricingCalculator,
    submission_timeout: Option<Duration>,
    session_idle_timeout: Option<Duration>,
}

impl BookingSessionService {
    pub fn new(
        catalog: Arc<dyn BikeCatalog>,
        requester: Arc<dyn RentalRequester>,
        clock: Arc<dyn Clock>,
        pricing: PricingCalculator,
    ) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            catalog,
            requester,
            clock,
            pricing,
            submission_timeout: None,
            session_idle_timeout: Some(DEFAULT_SESSION_IDLE_TIMEOUT),
        }
    }

    /// Give up on a rental request after `timeout`; the attempt counts as an unknown failure
    pub fn with_submission_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.submission_timeout = timeout;
        self
    }

    /// Evict sessions untouched for `timeout`. None keeps sessions until closed.
    pub fn with_session_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.session_idle_timeout = timeout;
        self
    }

    pub fn pricing(&self) -> &PricingCalculator {
        &self.pricing
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
        lock(&self.sessions)
    }

    /// Run `f` against one page and render the result, all under the lock
    fn with_page<T>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut BookingPage, NaiveDate) -> Result<T, BookingError>,
    ) -> Result<(T, BookingPageView), BookingError> {
        let today = self.clock.today();
        let mut sessions = self.sessions();
        let entry = sessions
            .get_mut(&session_id)
            .ok_or(BookingError::SessionNotFound(session_id))?;
        entry.last_touched = Instant::now();
        let value = f(&mut entry.page, today)?;
        let view = entry.page.view(today, &self.pricing)?;
        Ok((value, view))
    }

    /// Drop sessions idle since before `now - idle timeout`. Returns how many were removed.
    pub fn evict_idle_sessions(&self, now: Instant) -> usize {
        let Some(timeout) = self.session_idle_timeout else {
            return 0;
        };
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|session_id, entry| {
            let keep = entry.is_submitting() || now.saturating_duration_since(entry.last_touched) < timeout;
            if !keep {
                debug!("Evicting idle booking session {}", session_id);
            }
            keep
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle booking session(s)", evicted);
        }
        evicted
    }

    pub fn session_count(&self) -> usize {
        self.sessions().len()
    }

    /// Open a booking page for a bike
    pub fn open_session(&self, bike_id: &str, user_id: &str) -> Result<BookingPageView, BookingError> {
        if user_id.trim().is_empty() {
            return Err(BookingError::MissingUserId);
        }
        let bike = self
            .catalog
            .get_bike(bike_id)
            .ok_or_else(|| BookingError::BikeNotFound(bike_id.to_string()))?;

        self.evict_idle_sessions(Instant::now());

        let today = self.clock.today();
        let session_id = Uuid::new_v4();
        let page = BookingPage::new(session_id, bike, user_id.to_string(), today);
        let view = page.view(today, &self.pricing)?;

        self.sessions().insert(
            session_id,
            SessionEntry {
                page,
                last_touched: Instant::now(),
            },
        );
        info!("Opened booking session {} for bike {} (user {})", session_id, bike_id, user_id);
        Ok(view)
    }

    /// Close a session. Refused while its rental request is in flight.
    pub fn close_session(&self, session_id: Uuid) -> Result<(), BookingError> {
        let mut sessions = self.sessions();
        let submitting = sessions
            .get(&session_id)
            .map(SessionEntry::is_submitting)
            .ok_or(BookingError::SessionNotFound(session_id))?;
        if submitting {
            return Err(SubmissionError::InFlight.into());
        }
        sessions.remove(&session_id);
        info!("Closed booking session {}", session_id);
        Ok(())
    }

    pub fn get_view(&self, session_id: Uuid) -> Result<BookingPageView, BookingError> {
        self.with_page(session_id, |_, _| Ok(())).map(|(_, view)| view)
    }

    pub fn previous_month(&self, session_id: Uuid) -> Result<BookingPageView, BookingError> {
        self.with_page(session_id, |page, today| Ok(page.previous_month(today)))
            .map(|(_, view)| view)
    }

    pub fn next_month(&self, session_id: Uuid) -> Result<BookingPageView, BookingError> {
        self.with_page(session_id, |page, _| Ok(page.next_month()?))
            .map(|(_, view)| view)
    }

    pub fn click_day(&self, session_id: Uuid, day: u32) -> Result<DayClickResponse, BookingError> {
        let (result, page) = self.with_page(session_id, |page, today| Ok(page.click_day(day, today)?))?;
        Ok(DayClickResponse { result, page })
    }

    pub fn clear_selection(&self, session_id: Uuid) -> Result<BookingPageView, BookingError> {
        self.with_page(session_id, |page, _| {
            page.clear_selection();
            Ok(())
        })
        .map(|(_, view)| view)
    }

    /// Send the current selection to the rental desk
    pub async fn submit(&self, session_id: Uuid) -> Result<SubmitBookingResponse, BookingError> {
        let (rent_data, _) = self.with_page(session_id, |page, _| Ok(page.begin_submission()?))?;
        let mut pending = PendingSubmission {
            sessions: self.sessions.clone(),
            session_id,
            settled: false,
        };
        info!(
            "Submitting booking session {}: {} to {}",
            session_id, rent_data.date_from, rent_data.date_to
        );

        let request = self.requester.post(RENT_PATH, &rent_data);
        let outcome = match self.submission_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, request).await {
                Ok(result) => RentOutcome::from_result(result),
                Err(_) => {
                    warn!("Rental request for session {} timed out after {:?}", session_id, timeout);
                    RentOutcome::Unknown {
                        status: None,
                        detail: format!("Timed out after {:?}", timeout),
                    }
                }
            },
            None => RentOutcome::from_result(request.await),
        };

        let applied = self.with_page(session_id, |page, _| {
            page.complete_submission(&outcome);
            Ok(())
        });
        pending.settle();
        let (_, page) = applied?;

        let outcome = match outcome {
            RentOutcome::Success => SubmitOutcome::Confirmed,
            RentOutcome::Rejected => SubmitOutcome::Rejected,
            RentOutcome::Unknown { .. } => SubmitOutcome::UnknownError,
        };
        Ok(SubmitBookingResponse { outcome, page })
    }
}
