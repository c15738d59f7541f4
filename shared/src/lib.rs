use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Logical resource the rental request collaborator is addressed with
pub const RENT_PATH: &str = "/bikes/rent";

/// A bike as provided by the bike data collaborator. Read-only for the booking engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bike {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price per day
    pub rate: f64,
    /// Ordered gallery images, first one is the cover
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub body_size: Option<u32>,
    pub max_load: Option<u32>,
    pub ratings: Option<f64>,
    #[serde(rename = "type")]
    pub bike_type: String,
}

/// Body of a rental request sent to `RENT_PATH`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentData {
    pub bike_id: Option<String>,
    pub user_id: String,
    /// YYYY-MM-DD
    pub date_from: String,
    /// YYYY-MM-DD
    pub date_to: String,
}

/// Reply of the rental request collaborator. Only the status code is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentResponse {
    pub status: u16,
    pub rental_id: Option<String>,
    pub message: Option<String>,
}

impl RentResponse {
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            rental_id: None,
            message: None,
        }
    }
}

/// Request for opening a booking session on a bike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenBookingSessionRequest {
    pub bike_id: String,
    pub user_id: String,
}

/// Request for clicking a day of the displayed month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayClickRequest {
    /// Day of month, 1-based
    pub day: u32,
}

/// How a rendered calendar day relates to today and the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    Past,
    Start,
    End,
    BetweenEdges,
    Plain,
}

/// A single day cell of the booking calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingCalendarDay {
    pub day: u32,
    pub date: String,
    pub kind: DayKind,
}

/// The month currently displayed by the booking calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCalendarMonth {
    pub year: i32,
    /// 0 = January, 11 = December
    pub month: u32,
    pub month_name: String,
    pub can_navigate_previous: bool,
    pub days: Vec<BookingCalendarDay>,
}

/// Currently selected rental period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSummary {
    pub start: Option<String>,
    pub end: Option<String>,
    /// e.g. "2023-12-16 - 2023-12-21"
    pub label: String,
}

/// Derived prices for the current selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalQuote {
    pub days_selected: u32,
    pub daily_rate: f64,
    pub weekly_rate: f64,
    pub daily_service_fee: f64,
    pub subtotal: f64,
    pub service_fee: f64,
    pub total: f64,
}

/// Where the booking page is in its submission lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Selecting,
    Submitting,
    Confirmed,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::Selecting => write!(f, "selecting"),
            SubmissionStatus::Submitting => write!(f, "submitting"),
            SubmissionStatus::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// Why the last submission did not confirm the booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum SubmissionFailure {
    /// The rental desk answered 400
    Rejected,
    /// Any other status, a transport error or a timeout
    Unknown { status: Option<u16>, detail: String },
}

/// Everything a frontend needs to draw the booking page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPageView {
    pub session_id: Uuid,
    pub user_id: String,
    pub bike: Bike,
    pub calendar: BookingCalendarMonth,
    pub selection: SelectionSummary,
    pub quote: RentalQuote,
    pub status: SubmissionStatus,
    pub last_failure: Option<SubmissionFailure>,
    pub can_submit: bool,
    /// Set once the booking is confirmed
    pub confirmation_message: Option<String>,
}

/// Result of clicking a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayClickResult {
    StartSelected,
    EndSelected,
    IgnoredPastDay,
    IgnoredBeforeStart,
    IgnoredConfirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayClickResponse {
    pub result: DayClickResult,
    pub page: BookingPageView,
}

/// How a submission attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    Confirmed,
    Rejected,
    UnknownError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitBookingResponse {
    pub outcome: SubmitOutcome,
    pub page: BookingPageView,
}

/// Error body returned by the REST layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
