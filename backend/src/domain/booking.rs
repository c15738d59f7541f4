//! Booking submission.
//!
//! A booking page moves through `Selecting -> Submitting -> Confirmed`. A
//! rejected or failed request sends it back to `Selecting` with the failure
//! recorded, so the user can simply submit again.
//!
//! Submitting is split in two so the caller can release its lock while the
//! rental request is in flight: `begin` validates and captures the request
//! body, `complete` applies the collaborator's answer. While a request is in
//! flight `begin` refuses to start another one.

use anyhow::Result;
use async_trait::async_trait;
use shared::{RentData, RentResponse, SubmissionFailure, SubmissionStatus};
use tracing::{error, info, warn};

use crate::domain::range_selection::SelectionRange;

/// The external rental request collaborator
#[async_trait]
pub trait RentalRequester: Send + Sync {
    /// Send `body` to the logical resource `path` and return the reply status
    async fn post(&self, path: &str, body: &RentData) -> Result<RentResponse>;
}

/// Three-way reading of a rental reply
#[derive(Debug, Clone, PartialEq)]
pub enum RentOutcome {
    Success,
    Rejected,
    Unknown { status: Option<u16>, detail: String },
}

impl RentOutcome {
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => RentOutcome::Success,
            400 => RentOutcome::Rejected,
            other => RentOutcome::Unknown {
                status: Some(other),
                detail: format!("Unexpected status {}", other),
            },
        }
    }

    /// Interpret the collaborator's result, treating transport errors as unknown
    pub fn from_result(result: Result<RentResponse>) -> Self {
        match result {
            Ok(response) => Self::from_status(response.status),
            Err(e) => RentOutcome::Unknown {
                status: None,
                detail: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Select a start date before booking")]
    NoStartDate,
    #[error("A booking request is already in flight")]
    InFlight,
    #[error("This booking is already confirmed")]
    AlreadyConfirmed,
}

#[derive(Debug, Clone)]
pub struct BookingSubmission {
    status: SubmissionStatus,
    last_failure: Option<SubmissionFailure>,
}

impl BookingSubmission {
    pub fn new() -> Self {
        Self {
            status: SubmissionStatus::Selecting,
            last_failure: None,
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn last_failure(&self) -> Option<&SubmissionFailure> {
        self.last_failure.as_ref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == SubmissionStatus::Confirmed
    }

    /// Whether the booking button is enabled
    pub fn can_submit(&self, range: &SelectionRange) -> bool {
        self.status == SubmissionStatus::Selecting && range.start().is_some()
    }

    /// Move to `Submitting` and build the request body.
    /// A missing end date books the start day only.
    pub fn begin(
        &mut self,
        range: &SelectionRange,
        bike_id: Option<&str>,
        user_id: &str,
    ) -> Result<RentData, SubmissionError> {
        match self.status {
            SubmissionStatus::Submitting => return Err(SubmissionError::InFlight),
            SubmissionStatus::Confirmed => return Err(SubmissionError::AlreadyConfirmed),
            SubmissionStatus::Selecting => {}
        }

        let start = range.start().ok_or(SubmissionError::NoStartDate)?;
        let end = range.end().unwrap_or(start);

        self.status = SubmissionStatus::Submitting;
        Ok(RentData {
            bike_id: bike_id.map(str::to_string),
            user_id: user_id.to_string(),
            date_from: start.to_string(),
            date_to: end.to_string(),
        })
    }

    /// Apply the outcome of the request started by `begin`
    pub fn complete(&mut self, outcome: &RentOutcome) {
        match outcome {
            RentOutcome::Success => {
                info!("Booking confirmed");
                self.status = SubmissionStatus::Confirmed;
                self.last_failure = None;
            }
            RentOutcome::Rejected => {
                warn!("Booking request rejected by the rental desk");
                self.status = SubmissionStatus::Selecting;
                self.last_failure = Some(SubmissionFailure::Rejected);
            }
            RentOutcome::Unknown { status, detail } => {
                error!("Booking request failed (status {:?}): {}", status, detail);
                self.status = SubmissionStatus::Selecting;
                self.last_failure = Some(SubmissionFailure::Unknown {
                    status: *status,
                    detail: detail.clone(),
                });
            }
        }
    }
}

impl Default for BookingSubmission {
    fn default() -> Self {
        Self::new()
    }
}
