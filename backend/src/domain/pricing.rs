//! Rental price computation.
//!
//! Prices are derived on every read from the daily rate and the current
//! selection; nothing here holds state besides the configured service fee.
//! No currency rounding is applied, fractional totals are returned as-is.

use shared::RentalQuote;

use crate::domain::range_selection::SelectionRange;

/// Default service fee, as a fraction of the daily rate
pub const SERVICE_FEE_PERCENTAGE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Service fee percentage must be between 0 and 1, got {0}")]
    InvalidServiceFee(f64),
    #[error("Daily rate must be a non-negative number, got {0}")]
    InvalidRate(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingCalculator {
    service_fee_percentage: f64,
}

impl PricingCalculator {
    pub fn new(service_fee_percentage: f64) -> Result<Self, PricingError> {
        if !service_fee_percentage.is_finite() || !(0.0..=1.0).contains(&service_fee_percentage) {
            return Err(PricingError::InvalidServiceFee(service_fee_percentage));
        }
        Ok(Self { service_fee_percentage })
    }

    pub fn service_fee_percentage(&self) -> f64 {
        self.service_fee_percentage
    }

    /// Fee charged on top of one day of rental
    pub fn service_fee(&self, daily_rate: f64) -> f64 {
        daily_rate * self.service_fee_percentage
    }

    /// Inclusive number of days in the selection.
    ///
    /// An empty start or end counts as a single-day booking, and a range
    /// counts both endpoints, so start == end yields 1.
    pub fn days_selected(&self, range: &SelectionRange) -> u32 {
        match (range.start(), range.end()) {
            (Some(start), Some(end)) => {
                let diff = end.to_naive().signed_duration_since(start.to_naive()).num_days();
                1 + u32::try_from(diff.max(0)).unwrap_or(u32::MAX - 1)
            }
            _ => 1,
        }
    }

    pub fn total(&self, daily_rate: f64, range: &SelectionRange) -> f64 {
        (daily_rate + self.service_fee(daily_rate)) * f64::from(self.days_selected(range))
    }

    /// Full price breakdown for the selection
    pub fn quote(&self, daily_rate: f64, range: &SelectionRange) -> Result<RentalQuote, PricingError> {
        if !daily_rate.is_finite() || daily_rate < 0.0 {
            return Err(PricingError::InvalidRate(daily_rate));
        }

        let days_selected = self.days_selected(range);
        let days = f64::from(days_selected);
        let daily_service_fee = self.service_fee(daily_rate);

        Ok(RentalQuote {
            days_selected,
            daily_rate,
            weekly_rate: daily_rate * 7.0,
            daily_service_fee,
            subtotal: daily_rate * days,
            service_fee: daily_service_fee * days,
            total: self.total(daily_rate, range),
        })
    }
}

impl Default for PricingCalculator {
    fn default() -> Self {
        Self {
            service_fee_percentage: SERVICE_FEE_PERCENTAGE,
        }
    }
}
