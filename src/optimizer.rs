//! Tour construction and local search.
//!
//! Construction is greedy nearest-neighbor from the depot; improvement is
//! first-improvement 2-opt. Both are deterministic for a fixed matrix.
//! A 2-opt pass scores O(N²) candidates at O(N) each, which is fine for a
//! single vehicle's daily stops but not for hundreds of stops.

use crate::cost::{tour_score, Weights};
use crate::matrix::CostMatrix;
use crate::traits::TourImprover;

/// Index of the depot in every stop list.
pub const DEPOT: usize = 0;

/// Greedy tour from the depot: always move to the cheapest unvisited stop.
///
/// Candidates are scanned in ascending index order and only a strictly
/// cheaper one replaces the current pick, so ties go to the lowest index.
/// If every remaining candidate is unreachable the walk stops early and
/// the returned tour is shorter than `size + 1`. The tour always ends at
/// the depot.
pub fn nearest_neighbor(matrix: &CostMatrix, weights: &Weights) -> Vec<usize> {
    let n = matrix.size();
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n + 1);

    tour.push(DEPOT);
    if n == 0 {
        tour.push(DEPOT);
        return tour;
    }
    visited[DEPOT] = true;

    let mut current = DEPOT;
    for _ in 1..n {
        let mut best: Option<usize> = None;
        let mut best_cost = f64::INFINITY;

        for next in 0..n {
            if visited[next] {
                continue;
            }
            let cost = weights.segment_cost(matrix.get(current, next));
            if cost < best_cost {
                best_cost = cost;
                best = Some(next);
            }
        }

        match best {
            Some(next) => {
                tour.push(next);
                visited[next] = true;
                current = next;
            }
            None => break,
        }
    }

    tour.push(DEPOT);
    tour
}

/// First-improvement 2-opt over the interior of a closed tour.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOpt;

impl TwoOpt {
    /// First candidate that strictly beats `best_score`, if any.
    fn first_improvement(
        tour: &[usize],
        best_score: f64,
        matrix: &CostMatrix,
        weights: &Weights,
    ) -> Option<(Vec<usize>, f64)> {
        let last = tour.len().checked_sub(2)?;

        for i in 1..last {
            for j in i + 1..=last {
                let mut candidate = tour.to_vec();
                candidate[i..=j].reverse();

                let score = tour_score(&candidate, matrix, weights);
                if score < best_score {
                    return Some((candidate, score));
                }
            }
        }

        None
    }
}

impl TourImprover for TwoOpt {
    fn improve(&self, tour: Vec<usize>, matrix: &CostMatrix, weights: &Weights) -> Vec<usize> {
        let mut best = tour;
        let mut best_score = tour_score(&best, matrix, weights);

        while let Some((candidate, score)) =
            Self::first_improvement(&best, best_score, matrix, weights)
        {
            best = candidate;
            best_score = score;
        }

        best
    }
}

/// Nearest-neighbor construction followed by a pluggable improver.
#[derive(Debug, Clone, Default)]
pub struct Optimizer<I = TwoOpt> {
    improver: I,
    weights: Weights,
}

impl<I: TourImprover> Optimizer<I> {
    pub fn new(improver: I, weights: Weights) -> Self {
        Self { improver, weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn optimize(&self, matrix: &CostMatrix) -> Vec<usize> {
        let initial = nearest_neighbor(matrix, &self.weights);
        self.improver.improve(initial, matrix, &self.weights)
    }
}

/// Whether `tour` closes at the depot and visits each of `size` stops once.
pub fn is_complete_tour(tour: &[usize], size: usize) -> bool {
    if size == 0 || tour.len() != size + 1 {
        return false;
    }
    if tour[0] != DEPOT || tour[size] != DEPOT {
        return false;
    }

    let mut seen = vec![false; size];
    for &stop in &tour[1..size] {
        if stop == DEPOT || stop >= size || seen[stop] {
            return false;
        }
        seen[stop] = true;
    }
    true
}
