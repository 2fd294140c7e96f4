//! Test fixtures for tour-planner.
//!
//! Provides:
//! - Real delivery stops around Avcilar / Istanbul
//! - Table-driven and failing leg providers
//! - Seeded random matrices

#![allow(dead_code)]

pub mod istanbul_stops;
pub mod providers;

pub use istanbul_stops::*;
pub use providers::*;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use tour_planner::matrix::CostMatrix;

/// Asymmetric matrix of `n` stops with finite off-diagonal costs.
pub fn random_matrix(n: usize, seed: u64) -> CostMatrix {
    let mut rng = SmallRng::seed_from_u64(seed);
    let rows: Vec<Vec<(f64, f64)>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        (0.0, 0.0)
                    } else {
                        let distance = rng.random_range(0.5..10.5);
                        let minutes = distance * rng.random_range(1.0..3.0);
                        (distance, minutes)
                    }
                })
                .collect()
        })
        .collect();
    CostMatrix::from_costs(&rows)
}

/// Matrix where both distance and traffic time equal `cost(i, j)`.
pub fn matrix_from(n: usize, cost: impl Fn(usize, usize) -> f64) -> CostMatrix {
    let rows: Vec<Vec<(f64, f64)>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j { (0.0, 0.0) } else { (cost(i, j), cost(i, j)) })
                .collect()
        })
        .collect();
    CostMatrix::from_costs(&rows)
}
