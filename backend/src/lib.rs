//! # Bike Rental Backend
//!
//! Hosts the booking page engine for the bike rental site.
//!
//! - **Domain**: calendar cursor, range selection, pricing and booking submission
//! - **IO**: REST API exposing booking sessions, the bike catalog and the rental desk
//!
//! ## Architecture
//!
//! ```text
//! Frontend (any)
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (booking sessions, calendar, pricing)
//! ```

pub mod config;
pub mod domain;
pub mod io;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    BikeCatalog, BookingSessionService, Clock, InMemoryBikeCatalog, PricingCalculator, RentalDesk,
    SystemClock,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn BikeCatalog>,
    pub rental_desk: RentalDesk,
    pub booking_service: BookingSessionService,
}

/// Initialize the backend with the system clock
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    initialize_backend_with_clock(config, Arc::new(SystemClock))
}

/// Initialize the backend with an explicit source of today's date
pub fn initialize_backend_with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<AppState> {
    info!("Setting up bike catalog");
    let catalog: Arc<dyn BikeCatalog> = match &config.catalog_path {
        Some(path) => Arc::new(InMemoryBikeCatalog::from_json_file(path)?),
        None => Arc::new(InMemoryBikeCatalog::sample()),
    };

    info!("Setting up domain model");
    let pricing = PricingCalculator::new(config.service_fee_percentage)?;
    let rental_desk = RentalDesk::new(catalog.clone());
    let booking_service = BookingSessionService::new(
        catalog.clone(),
        Arc::new(rental_desk.clone()),
        clock,
        pricing,
    )
    .with_submission_timeout(config.submission_timeout)
    .with_session_idle_timeout(config.session_idle_timeout);

    Ok(AppState {
        catalog,
        rental_desk,
        booking_service,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let origin: HeaderValue = config.cors_origin.parse()?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/bikes", io::rest::bike_apis::router())
        .nest("/booking-sessions", io::rest::booking_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}
