//! Request and response shapes of the trip planning backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::day::DayPlan;
use crate::route::RouteGeometry;

/// Upper bound of the 70-hour/8-day cycle.
pub const MAX_CYCLE_HOURS: f64 = 70.0;

/// Validation errors for plan requests.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanRequestError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("current cycle used hours must be between 0 and 70, got {value}")]
    CycleHoursOutOfRange { value: f64 },
}

/// Trip to plan. Locations are `"lat,lng"` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub current_cycle_used_hours: f64,
}

impl PlanRequest {
    /// Checks the fields the backend would reject anyway.
    pub fn validate(&self) -> Result<(), PlanRequestError> {
        for (field, value) in [
            ("current location", &self.current_location),
            ("pickup location", &self.pickup_location),
            ("dropoff location", &self.dropoff_location),
        ] {
            if value.trim().is_empty() {
                return Err(PlanRequestError::Empty { field });
            }
        }
        let hours = self.current_cycle_used_hours;
        if hours.is_nan() || !(0.0..=MAX_CYCLE_HOURS).contains(&hours) {
            return Err(PlanRequestError::CycleHoursOutOfRange { value: hours });
        }
        Ok(())
    }
}

/// Planned trip as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    #[serde(default)]
    pub route_geojson: Value,

    #[serde(default)]
    pub stops: Vec<Value>,

    #[serde(default)]
    pub day_plans: Vec<DayPlan>,

    #[serde(default)]
    pub summary: Map<String, Value>,
}

impl PlanResponse {
    pub fn route(&self) -> Option<RouteGeometry> {
        RouteGeometry::from_geojson(&self.route_geojson)
    }
}
