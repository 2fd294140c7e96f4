//! Weighted cost model shared by the optimizer and the result assembler.

use serde::{Deserialize, Serialize};

use crate::matrix::CostMatrix;
use crate::segment::Segment;

/// Relative weight of distance (km) and traffic-adjusted time (minutes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub distance: f64,
    pub traffic_time: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            distance: 0.4,
            traffic_time: 0.6,
        }
    }
}

impl Weights {
    /// Weighted cost of a single segment. Infinite for the sentinel, even
    /// when one of the weights is zero.
    pub fn segment_cost(&self, segment: &Segment) -> f64 {
        if segment.is_unreachable() {
            return f64::INFINITY;
        }
        self.cost(segment.distance_km, segment.traffic_minutes)
    }

    pub fn cost(&self, distance_km: f64, traffic_minutes: f64) -> f64 {
        self.distance * distance_km + self.traffic_time * traffic_minutes
    }
}

/// Sum of weighted leg costs over consecutive tour positions.
pub fn tour_score(tour: &[usize], matrix: &CostMatrix, weights: &Weights) -> f64 {
    tour.windows(2)
        .map(|leg| weights.segment_cost(matrix.get(leg[0], leg[1])))
        .sum()
}
