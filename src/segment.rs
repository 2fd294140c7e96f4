//! Directed edges between stops.

use serde::{Deserialize, Serialize};

use crate::polyline::Polyline;
use crate::traffic::{TrafficEstimate, TrafficSource};

/// A single turn-by-turn instruction and the path it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub text: String,
    pub geometry: Polyline,
}

/// What a routing provider returns for one directed stop pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance_km: f64,
    /// Free-flow driving duration before any traffic adjustment.
    pub duration_minutes: f64,
    pub geometry: Polyline,
    pub instructions: Vec<Instruction>,
}

/// Cost and path of travelling from one stop to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub distance_km: f64,
    pub traffic_minutes: f64,
    pub geometry: Polyline,
    pub instructions: Vec<Instruction>,
    pub traffic_source: TrafficSource,
}

impl Segment {
    /// Zero-cost segment from a stop to itself.
    pub fn identity() -> Self {
        Self {
            distance_km: 0.0,
            traffic_minutes: 0.0,
            geometry: Polyline::default(),
            instructions: Vec::new(),
            traffic_source: TrafficSource::None,
        }
    }

    /// Placeholder for a pair no provider could route. Its infinite cost
    /// loses every comparison against a reachable alternative.
    pub fn unreachable() -> Self {
        Self {
            distance_km: f64::INFINITY,
            traffic_minutes: f64::INFINITY,
            geometry: Polyline::default(),
            instructions: Vec::new(),
            traffic_source: TrafficSource::None,
        }
    }

    pub fn from_leg(leg: RouteLeg, traffic: TrafficEstimate) -> Self {
        Self {
            distance_km: leg.distance_km,
            traffic_minutes: traffic.minutes,
            geometry: leg.geometry,
            instructions: leg.instructions,
            traffic_source: traffic.source,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        !self.distance_km.is_finite() || !self.traffic_minutes.is_finite()
    }
}
