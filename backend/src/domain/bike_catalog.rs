//! Read-only bike data for the booking pages.

use anyhow::{Context, Result};
use shared::Bike;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Source of the bike shown on a booking page. Never mutated by the booking engine.
pub trait BikeCatalog: Send + Sync {
    fn get_bike(&self, bike_id: &str) -> Option<Bike>;

    /// All bikes ordered by id
    fn list_bikes(&self) -> Vec<Bike>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBikeCatalog {
    bikes: BTreeMap<String, Bike>,
}

impl InMemoryBikeCatalog {
    /// Build a catalog, rejecting bikes with a negative or non-finite rate
    pub fn from_bikes(bikes: Vec<Bike>) -> Result<Self> {
        let mut by_id = BTreeMap::new();
        for bike in bikes {
            if !bike.rate.is_finite() || bike.rate < 0.0 {
                anyhow::bail!("Bike {} has an invalid daily rate: {}", bike.id, bike.rate);
            }
            if by_id.insert(bike.id.clone(), bike).is_some() {
                anyhow::bail!("Duplicate bike id in catalog");
            }
        }
        Ok(Self { bikes: by_id })
    }

    /// Load a JSON array of bikes
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read bike catalog {}", path.display()))?;
        let bikes: Vec<Bike> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse bike catalog {}", path.display()))?;
        info!("Loaded {} bikes from {}", bikes.len(), path.display());
        Self::from_bikes(bikes)
    }

    /// Small built-in catalog used when no catalog file is configured
    pub fn sample() -> Self {
        let bikes = [
            sample_bike("bike-1", "Urban Commuter", "Light aluminium frame with a rear rack.", 20.0, "City", 54, 110, 4.6),
            sample_bike("bike-2", "Trail Blazer", "Full suspension for rough single tracks.", 45.0, "Mountain", 48, 120, 4.8),
            sample_bike("bike-3", "Cargo Hauler", "Front box that fits two kids or a week of groceries.", 35.5, "Cargo", 56, 200, 4.3),
        ];
        Self {
            bikes: bikes.into_iter().map(|bike| (bike.id.clone(), bike)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bikes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bikes.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn sample_bike(
    id: &str,
    name: &str,
    description: &str,
    rate: f64,
    bike_type: &str,
    body_size: u32,
    max_load: u32,
    ratings: f64,
) -> Bike {
    Bike {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        rate,
        image_urls: vec![
            format!("/images/{}/cover.jpg", id),
            format!("/images/{}/side.jpg", id),
        ],
        body_size: Some(body_size),
        max_load: Some(max_load),
        ratings: Some(ratings),
        bike_type: bike_type.to_string(),
    }
}

impl BikeCatalog for InMemoryBikeCatalog {
    fn get_bike(&self, bike_id: &str) -> Option<Bike> {
        self.bikes.get(bike_id).cloned()
    }

    fn list_bikes(&self) -> Vec<Bike> {
        self.bikes.values().cloned().collect()
    }
}
