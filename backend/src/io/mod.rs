//! # IO Module
//!
//! Interface layer between HTTP clients and the domain.
//!
//! Handlers translate JSON requests into domain calls and domain errors into
//! status codes. No booking rules live here.

pub mod rest;

pub use rest::*;
