use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use shared::{DayClickRequest, ErrorResponse, OpenBookingSessionRequest};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::BookingError;
use crate::AppState;

/// Create a router for booking session APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(open_session))
        .route("/:session_id", get(get_session).delete(close_session))
        .route("/:session_id/calendar/previous", post(previous_month))
        .route("/:session_id/calendar/next", post(next_month))
        .route("/:session_id/days/click", post(click_day))
        .route("/:session_id/selection/clear", post(clear_selection))
        .route("/:session_id/submit", post(submit_booking))
}

fn error_response(e: BookingError) -> Response {
    let status = match &e {
        BookingError::SessionNotFound(_) | BookingError::BikeNotFound(_) => StatusCode::NOT_FOUND,
        BookingError::MissingUserId | BookingError::Calendar(_) => StatusCode::BAD_REQUEST,
        BookingError::Submission(_) => StatusCode::CONFLICT,
        BookingError::Pricing(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Booking request failed: {}", e);
    } else {
        warn!("Booking request refused: {}", e);
    }
    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}

async fn open_session(
    State(state): State<AppState>,
    Json(request): Json<OpenBookingSessionRequest>,
) -> Response {
    info!("POST /api/booking-sessions - request: {:?}", request);

    match state.booking_service.open_session(&request.bike_id, &request.user_id) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_session(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Response {
    info!("GET /api/booking-sessions/{}", session_id);

    match state.booking_service.get_view(session_id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn close_session(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Response {
    info!("DELETE /api/booking-sessions/{}", session_id);

    match state.booking_service.close_session(session_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

async fn previous_month(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Response {
    info!("POST /api/booking-sessions/{}/calendar/previous", session_id);

    match state.booking_service.previous_month(session_id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn next_month(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Response {
    info!("POST /api/booking-sessions/{}/calendar/next", session_id);

    match state.booking_service.next_month(session_id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn click_day(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<DayClickRequest>,
) -> Response {
    info!("POST /api/booking-sessions/{}/days/click - day {}", session_id, request.day);

    match state.booking_service.click_day(session_id, request.day) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn clear_selection(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Response {
    info!("POST /api/booking-sessions/{}/selection/clear", session_id);

    match state.booking_service.clear_selection(session_id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn submit_booking(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Response {
    info!("POST /api/booking-sessions/{}/submit", session_id);

    match state.booking_service.submit(session_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::create_router;
    use crate::domain::FixedClock;
    use crate::initialize_backend_with_clock;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use chrono::NaiveDate;
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use shared::{
        BookingPageView, DayClickResponse, DayClickResult, DayKind, SubmissionStatus,
        SubmitBookingResponse, SubmitOutcome,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn app() -> Result<Router, Box<dyn std::error::Error>> {
        let config = AppConfig::default();
        let clock = Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2023, 12, 16).ok_or("bad date")?,
        ));
        let app_state = initialize_backend_with_clock(&config, clock)?;
        Ok(create_router(app_state, &config)?)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<&impl Serialize>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let builder = Request::builder().uri(uri).method(method);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(body)?))?,
            None => builder.body(Body::empty())?,
        };
        Ok(app.clone().oneshot(request).await?)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, Box<dyn std::error::Error>> {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn open(app: &Router) -> Result<BookingPageView, Box<dyn std::error::Error>> {
        let request = OpenBookingSessionRequest {
            bike_id: "bike-1".to_string(),
            user_id: "user-1".to_string(),
        };
        let response = send(app, Method::POST, "/api/booking-sessions", Some(&request)).await?;
        assert_eq!(response.status(), StatusCode::CREATED);
        read_json(response).await
    }

    async fn click(app: &Router, id: Uuid, day: u32) -> Result<DayClickResponse, Box<dyn std::error::Error>> {
        let uri = format!("/api/booking-sessions/{}/days/click", id);
        let response = send(app, Method::POST, &uri, Some(&DayClickRequest { day })).await?;
        assert_eq!(response.status(), StatusCode::OK);
        read_json(response).await
    }

    #[tokio::test]
    async fn test_open_and_get_session() -> TestResult {
        let app = app()?;
        let view = open(&app).await?;
        assert_eq!(view.calendar.month_name, "December");
        assert_eq!(view.calendar.year, 2023);
        assert!(!view.calendar.can_navigate_previous);
        assert!(!view.can_submit);

        let uri = format!("/api/booking-sessions/{}", view.session_id);
        let response = send(&app, Method::GET, &uri, None::<&()>).await?;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: BookingPageView = read_json(response).await?;
        assert_eq!(fetched.session_id, view.session_id);
        Ok(())
    }

    #[tokio::test]
    async fn test_open_session_for_unknown_bike() -> TestResult {
        let app = app()?;
        let request = OpenBookingSessionRequest {
            bike_id: "missing".to_string(),
            user_id: "user-1".to_string(),
        };
        let response = send(&app, Method::POST, "/api/booking-sessions", Some(&request)).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = read_json(response).await?;
        assert!(error.error.contains("missing"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_session() -> TestResult {
        let app = app()?;
        let uri = format!("/api/booking-sessions/{}", Uuid::new_v4());
        let response = send(&app, Method::GET, &uri, None::<&()>).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_calendar_navigation() -> TestResult {
        let app = app()?;
        let id = open(&app).await?.session_id;

        let uri = format!("/api/booking-sessions/{}/calendar/previous", id);
        let response = send(&app, Method::POST, &uri, None::<&()>).await?;
        let view: BookingPageView = read_json(response).await?;
        assert_eq!((view.calendar.year, view.calendar.month), (2023, 11));

        let uri = format!("/api/booking-sessions/{}/calendar/next", id);
        let response = send(&app, Method::POST, &uri, None::<&()>).await?;
        let view: BookingPageView = read_json(response).await?;
        assert_eq!((view.calendar.year, view.calendar.month), (2024, 0));
        assert_eq!(view.calendar.month_name, "January");
        assert!(view.calendar.can_navigate_previous);
        Ok(())
    }

    #[tokio::test]
    async fn test_select_range_and_quote() -> TestResult {
        let app = app()?;
        let id = open(&app).await?.session_id;

        assert_eq!(click(&app, id, 15).await?.result, DayClickResult::IgnoredPastDay);
        assert_eq!(click(&app, id, 16).await?.result, DayClickResult::StartSelected);
        let response = click(&app, id, 21).await?;
        assert_eq!(response.result, DayClickResult::EndSelected);

        let page = response.page;
        assert_eq!(page.calendar.days[16].kind, DayKind::BetweenEdges);
        assert_eq!(page.calendar.days[20].kind, DayKind::End);
        assert_eq!(page.quote.days_selected, 6);
        // bike-1 rents for 20 a day with the default 10% fee
        assert!((page.quote.total - 132.0).abs() < 1e-9);
        assert!(page.can_submit);

        let uri = format!("/api/booking-sessions/{}/selection/clear", id);
        let response = send(&app, Method::POST, &uri, None::<&()>).await?;
        let view: BookingPageView = read_json(response).await?;
        assert_eq!(view.selection.label, "");
        assert_eq!(view.quote.days_selected, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_click_outside_month() -> TestResult {
        let app = app()?;
        let id = open(&app).await?.session_id;

        let uri = format!("/api/booking-sessions/{}/days/click", id);
        let response = send(&app, Method::POST, &uri, Some(&DayClickRequest { day: 32 })).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_flow() -> TestResult {
        let app = app()?;
        let id = open(&app).await?.session_id;
        let uri = format!("/api/booking-sessions/{}/submit", id);

        // Nothing selected yet
        let response = send(&app, Method::POST, &uri, None::<&()>).await?;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        click(&app, id, 16).await?;
        let response = send(&app, Method::POST, &uri, None::<&()>).await?;
        assert_eq!(response.status(), StatusCode::OK);
        let submitted: SubmitBookingResponse = read_json(response).await?;
        assert_eq!(submitted.outcome, SubmitOutcome::Confirmed);
        assert_eq!(submitted.page.status, SubmissionStatus::Confirmed);
        assert!(submitted.page.confirmation_message.is_some());

        let response = send(&app, Method::POST, &uri, None::<&()>).await?;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        Ok(())
    }

    #[tokio::test]
    async fn test_close_session() -> TestResult {
        let app = app()?;
        let id = open(&app).await?.session_id;
        let uri = format!("/api/booking-sessions/{}", id);

        let response = send(&app, Method::DELETE, &uri, None::<&()>).await?;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::GET, &uri, None::<&()>).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }
}
