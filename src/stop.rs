//! Stops to visit.

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;

/// A named point to visit. Index 0 of a stop list is the depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Stop {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Location as (latitude, longitude).
    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// `<lat>,<lon>` as used inside cache keys.
    pub fn coord_key(&self) -> String {
        coord_key(self.location())
    }

    pub fn validate(&self) -> Result<(), PlannerError> {
        let valid = self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon);

        if valid {
            Ok(())
        } else {
            Err(PlannerError::InvalidCoordinate {
                name: self.name.clone(),
                lat: self.lat,
                lon: self.lon,
            })
        }
    }
}

pub(crate) fn coord_key(location: (f64, f64)) -> String {
    format!("{},{}", location.0, location.1)
}

/// Cache key for the speed sample at a point.
pub fn speed_key(location: (f64, f64)) -> String {
    format!("traffic:{}", coord_key(location))
}

/// Cache key for the traffic-adjusted time of a directed pair.
pub fn traffic_time_key(from: &Stop, to: &Stop) -> String {
    format!("trafficTime:{}:{}", from.coord_key(), to.coord_key())
}

/// Cache key for the provider leg of a directed pair.
pub fn route_key(from: &Stop, to: &Stop) -> String {
    format!("route:{}:{}", from.coord_key(), to.coord_key())
}
