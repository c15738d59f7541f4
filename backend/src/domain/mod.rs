//! # Domain Module
//!
//! Business logic of the bike booking page, independent of HTTP.
//!
//! ## Module Organization
//!
//! - **calendar**: the displayed (year, month) cursor and month arithmetic
//! - **range_selection**: click-driven start/end selection and day classification
//! - **pricing**: inclusive day counting and price quotes
//! - **booking**: submission state machine and the rental request collaborator
//! - **booking_page**: the explicit per-page state and its rendered view
//! - **booking_session_service**: live pages keyed by session id
//! - **bike_catalog**: read-only bike data
//! - **rental_desk**: in-process answer to rental requests
//! - **clock**: source of today's date
//!
//! ## Business Rules
//!
//! - Dates are compared as canonical `YYYY-MM-DD` strings
//! - The calendar never navigates before the current month
//! - Only days before today in the current month are past
//! - A rental counts both its first and last day
//! - A booking is submitted at most once at a time and is final once confirmed

pub mod bike_catalog;
pub mod booking;
pub mod booking_page;
pub mod booking_session_service;
pub mod calendar;
pub mod clock;
pub mod models;
pub mod pricing;
pub mod range_selection;
pub mod rental_desk;

pub use bike_catalog::*;
pub use booking::*;
pub use booking_page::*;
pub use booking_session_service::*;
pub use calendar::*;
pub use clock::*;
pub use pricing::*;
pub use range_selection::*;
pub use rental_desk::*;
