//! Turns a tour into the route handed back to callers.

use serde::Serialize;

use crate::cost::Weights;
use crate::matrix::CostMatrix;
use crate::optimizer::is_complete_tour;
use crate::polyline::Polyline;
use crate::segment::Instruction;
use crate::stop::Stop;
use crate::traffic::TrafficSource;

/// A stop as it appears in the ordered tour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourStop {
    pub index: usize,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Distance and traffic time of one stop-to-stop leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegSummary {
    pub distance: f64,
    pub traffic_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetrics {
    /// Kilometres.
    pub total_distance: f64,
    /// Minutes.
    pub total_time: f64,
    pub total_cost: f64,
}

/// The optimized route with its path and per-leg breakdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedRoute {
    pub tour: Vec<TourStop>,
    pub total_cost: f64,
    pub metrics: RouteMetrics,
    pub geometry: Polyline,
    pub instructions: Vec<Instruction>,
    pub segments: Vec<LegSummary>,
    /// Set when the tour misses stops or crosses an unreachable leg.
    pub degraded: bool,
    /// Stops the tour could not reach, by index.
    pub unvisited: Vec<usize>,
    pub synthetic_traffic_legs: usize,
}

/// Walks `tour` and sums its legs the same way the optimizer scores them.
pub fn assemble(
    stops: &[Stop],
    tour: &[usize],
    matrix: &CostMatrix,
    weights: &Weights,
) -> OptimizedRoute {
    let mut total_distance = 0.0;
    let mut total_time = 0.0;
    let mut total_cost = 0.0;
    let mut geometry = Polyline::default();
    let mut instructions = Vec::new();
    let mut segments = Vec::with_capacity(tour.len().saturating_sub(1));
    let mut unreachable_legs = 0;
    let mut synthetic_traffic_legs = 0;

    for leg in tour.windows(2) {
        let segment = matrix.get(leg[0], leg[1]);

        total_distance += segment.distance_km;
        total_time += segment.traffic_minutes;
        total_cost += weights.segment_cost(segment);
        geometry.extend(&segment.geometry);
        instructions.extend(segment.instructions.iter().cloned());
        segments.push(LegSummary {
            distance: segment.distance_km,
            traffic_time: segment.traffic_minutes,
        });

        if segment.is_unreachable() {
            unreachable_legs += 1;
        }
        if segment.traffic_source == TrafficSource::Synthetic {
            synthetic_traffic_legs += 1;
        }
    }

    let mut visited = vec![false; stops.len()];
    for &index in tour {
        if let Some(seen) = visited.get_mut(index) {
            *seen = true;
        }
    }
    let unvisited: Vec<usize> = visited
        .iter()
        .enumerate()
        .filter(|(_, seen)| !**seen)
        .map(|(index, _)| index)
        .collect();

    let degraded = unreachable_legs > 0 || !is_complete_tour(tour, stops.len());

    OptimizedRoute {
        tour: tour
            .iter()
            .map(|&index| TourStop {
                index,
                name: stops[index].name.clone(),
                lat: stops[index].lat,
                lon: stops[index].lon,
            })
            .collect(),
        total_cost,
        metrics: RouteMetrics {
            total_distance,
            total_time,
            total_cost,
        },
        geometry,
        instructions,
        segments,
        degraded,
        unvisited,
        synthetic_traffic_legs,
    }
}
