//! # REST API Interface Layer
//!
//! - `bike_apis`: bike catalog reads and the rental desk (`/api/bikes`)
//! - `booking_apis`: booking sessions driving the calendar and submission (`/api/booking-sessions`)
//!
//! Errors are returned as `{ "error": "..." }` with 400, 404, 409 or 500.

pub mod bike_apis;
pub mod booking_apis;
