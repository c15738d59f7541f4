//! Runtime configuration read from the environment.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{DEFAULT_SESSION_IDLE_TIMEOUT, SERVICE_FEE_PERCENTAGE};

pub const BIND_VAR: &str = "BIKE_RENTAL_BIND";
pub const SERVICE_FEE_VAR: &str = "BIKE_RENTAL_SERVICE_FEE";
pub const SUBMIT_TIMEOUT_VAR: &str = "BIKE_RENTAL_SUBMIT_TIMEOUT_SECS";
pub const CORS_ORIGIN_VAR: &str = "BIKE_RENTAL_CORS_ORIGIN";
pub const CATALOG_VAR: &str = "BIKE_RENTAL_CATALOG";
pub const SESSION_IDLE_VAR: &str = "BIKE_RENTAL_SESSION_IDLE_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_address: SocketAddr,
    pub service_fee_percentage: f64,
    /// None means wait for the rental desk indefinitely
    pub submission_timeout: Option<Duration>,
    /// None keeps booking sessions until they are closed
    pub session_idle_timeout: Option<Duration>,
    pub cors_origin: String,
    /// JSON bike catalog; the built-in sample catalog is used when unset
    pub catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            service_fee_percentage: SERVICE_FEE_PERCENTAGE,
            submission_timeout: None,
            session_idle_timeout: Some(DEFAULT_SESSION_IDLE_TIMEOUT),
            cors_origin: "http://localhost:8080".to_string(),
            catalog_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, falling back to defaults for unset keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(bind) = get(BIND_VAR) {
            config.bind_address = bind
                .parse()
                .with_context(|| format!("{} must be a socket address, got '{}'", BIND_VAR, bind))?;
        }

        if let Some(fee) = get(SERVICE_FEE_VAR) {
            let fee: f64 = fee
                .parse()
                .with_context(|| format!("{} must be a number, got '{}'", SERVICE_FEE_VAR, fee))?;
            if !(0.0..=1.0).contains(&fee) {
                anyhow::bail!("{} must be between 0 and 1, got {}", SERVICE_FEE_VAR, fee);
            }
            config.service_fee_percentage = fee;
        }

        if let Some(secs) = get(SUBMIT_TIMEOUT_VAR) {
            let secs: u64 = secs.parse().with_context(|| {
                format!("{} must be a whole number of seconds, got '{}'", SUBMIT_TIMEOUT_VAR, secs)
            })?;
            config.submission_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(secs) = get(SESSION_IDLE_VAR) {
            let secs: u64 = secs.parse().with_context(|| {
                format!("{} must be a whole number of seconds, got '{}'", SESSION_IDLE_VAR, secs)
            })?;
            config.session_idle_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(origin) = get(CORS_ORIGIN_VAR) {
            config.cors_origin = origin;
        }

        config.catalog_path = get(CATALOG_VAR).map(PathBuf::from);

        Ok(config)
    }
}
