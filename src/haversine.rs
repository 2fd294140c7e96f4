//! Haversine leg provider (fallback when OSRM is unavailable).
//!
//! Uses great-circle distance and an assumed speed. Ignores the road
//! network, but never fails, which makes it useful offline and in tests.

use crate::error::ProviderError;
use crate::polyline::Polyline;
use crate::segment::{Instruction, RouteLeg};
use crate::stop::Stop;
use crate::traits::SegmentProvider;

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone)]
pub struct HaversineProvider {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineProvider {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineProvider {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two (lat, lon) points in kilometers.
    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lon1) = from;
        let (lat2, lon2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lon = (lon2 - lon1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    fn km_to_minutes(&self, km: f64) -> f64 {
        km / self.speed_kmh * 60.0
    }
}

impl SegmentProvider for HaversineProvider {
    fn fetch_leg(&self, from: &Stop, to: &Stop) -> Result<RouteLeg, ProviderError> {
        let km = Self::haversine_km(from.location(), to.location());
        let geometry = Polyline::new(vec![from.location(), to.location()]);

        Ok(RouteLeg {
            distance_km: km,
            duration_minutes: self.km_to_minutes(km),
            instructions: vec![Instruction {
                text: format!("Head to {}", to.name),
                geometry: geometry.clone(),
            }],
            geometry,
        })
    }
}
