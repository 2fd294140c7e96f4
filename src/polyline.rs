//! Route geometry as decoded coordinate sequences.
//!
//! Providers hand out GeoJSON `[lon, lat]` pairs; everything inside the
//! planner works on `(lat, lon)` points.

use serde::{Deserialize, Serialize};

/// An ordered sequence of (latitude, longitude) points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Builds a polyline from GeoJSON `[lon, lat]` coordinates.
    pub fn from_lon_lat(coordinates: &[[f64; 2]]) -> Self {
        Self {
            points: coordinates.iter().map(|[lon, lat]| (*lat, *lon)).collect(),
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends another polyline's points in order.
    pub fn extend(&mut self, other: &Polyline) {
        self.points.extend_from_slice(&other.points);
    }
}
