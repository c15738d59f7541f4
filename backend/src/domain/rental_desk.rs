//! In-process rental desk answering requests for `RENT_PATH`.
//!
//! The desk only checks that a request is well formed: it does not look at
//! other bookings for availability. Accepted rentals are kept in memory for
//! the lifetime of the process.

use anyhow::Result;
use async_trait::async_trait;
use shared::{RentData, RentResponse, RENT_PATH};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::bike_catalog::BikeCatalog;
use crate::domain::booking::RentalRequester;
use crate::domain::models::CalendarDate;

/// A rental accepted by the desk
#[derive(Debug, Clone, PartialEq)]
pub struct Rental {
    pub id: Uuid,
    pub bike_id: Option<String>,
    pub user_id: String,
    pub date_from: CalendarDate,
    pub date_to: CalendarDate,
}

#[derive(Clone)]
pub struct RentalDesk {
    catalog: Arc<dyn BikeCatalog>,
    rentals: Arc<Mutex<Vec<Rental>>>,
}

impl RentalDesk {
    pub fn new(catalog: Arc<dyn BikeCatalog>) -> Self {
        Self {
            catalog,
            rentals: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Validate and record a rental. Replies 200 on success, 400 otherwise.
    pub fn rent(&self, data: &RentData) -> RentResponse {
        match self.validate(data) {
            Ok((date_from, date_to)) => {
                let rental = Rental {
                    id: Uuid::new_v4(),
                    bike_id: data.bike_id.clone(),
                    user_id: data.user_id.clone(),
                    date_from,
                    date_to,
                };
                info!(
                    "Rental {} accepted: bike {:?} for {} from {} to {}",
                    rental.id, rental.bike_id, rental.user_id, rental.date_from, rental.date_to
                );
                let rental_id = rental.id.to_string();
                self.rentals
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(rental);
                RentResponse {
                    status: 200,
                    rental_id: Some(rental_id),
                    message: Some("Thank you for your booking!".to_string()),
                }
            }
            Err(reason) => {
                warn!("Rental rejected: {}", reason);
                RentResponse {
                    status: 400,
                    rental_id: None,
                    message: Some(reason),
                }
            }
        }
    }

    fn validate(&self, data: &RentData) -> Result<(CalendarDate, CalendarDate), String> {
        if data.user_id.trim().is_empty() {
            return Err("A user id is required".to_string());
        }
        if let Some(bike_id) = &data.bike_id {
            if self.catalog.get_bike(bike_id).is_none() {
                return Err(format!("Unknown bike: {}", bike_id));
            }
        }

        let date_from: CalendarDate = data.date_from.parse().map_err(|e| format!("dateFrom: {}", e))?;
        let date_to: CalendarDate = data.date_to.parse().map_err(|e| format!("dateTo: {}", e))?;
        if date_to < date_from {
            return Err(format!("dateTo {} is before dateFrom {}", date_to, date_from));
        }
        Ok((date_from, date_to))
    }

    /// Rentals accepted so far, oldest first
    pub fn rentals(&self) -> Vec<Rental> {
        self.rentals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RentalRequester for RentalDesk {
    async fn post(&self, path: &str, body: &RentData) -> Result<RentResponse> {
        if path != RENT_PATH {
            warn!("Rental desk has no resource at {}", path);
            return Ok(RentResponse::with_status(404));
        }
        Ok(self.rent(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bike_catalog::InMemoryBikeCatalog;

    fn desk() -> RentalDesk {
        RentalDesk::new(Arc::new(InMemoryBikeCatalog::sample()))
    }

    fn rent_data(bike_id: Option<&str>, from: &str, to: &str) -> RentData {
        RentData {
            bike_id: bike_id.map(str::to_string),
            user_id: "user-1".to_string(),
            date_from: from.to_string(),
            date_to: to.to_string(),
        }
    }

    #[test]
    fn test_accepts_valid_rental() {
        let desk = desk();
        let response = desk.rent(&rent_data(Some("bike-1"), "2023-12-16", "2023-12-21"));

        assert_eq!(response.status, 200);
        assert!(response.rental_id.is_some());

        let rentals = desk.rentals();
        assert_eq!(rentals.len(), 1);
        assert_eq!(rentals[0].date_to.as_str(), "2023-12-21");
    }

    #[test]
    fn test_accepts_rental_without_bike_id() {
        let response = desk().rent(&rent_data(None, "2023-12-16", "2023-12-16"));
        assert_eq!(response.status, 200);
    }

    #[test]
    fn test_rejects_malformed_requests() {
        let desk = desk();

        assert_eq!(desk.rent(&rent_data(Some("nope"), "2023-12-16", "2023-12-16")).status, 400);
        assert_eq!(desk.rent(&rent_data(None, "2023-12-21", "2023-12-16")).status, 400);
        assert_eq!(desk.rent(&rent_data(None, "16/12/2023", "2023-12-16")).status, 400);

        let mut anonymous = rent_data(None, "2023-12-16", "2023-12-16");
        anonymous.user_id = "  ".to_string();
        assert_eq!(desk.rent(&anonymous).status, 400);

        assert!(desk.rentals().is_empty());
    }

    #[tokio::test]
    async fn test_post_routes_by_path() -> Result<()> {
        let desk = desk();
        let data = rent_data(Some("bike-2"), "2024-01-01", "2024-01-02");

        assert_eq!(desk.post(RENT_PATH, &data).await?.status, 200);
        assert_eq!(desk.post("/bikes/return", &data).await?.status, 404);
        Ok(())
    }
}
