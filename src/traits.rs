//! Seams of the planning pipeline.
//!
//! Each trait marks a piece that can be swapped without touching the rest:
//! where road legs come from, how traffic delay is guessed when no live
//! sample exists, and how a constructed tour is improved.

use crate::cost::Weights;
use crate::error::ProviderError;
use crate::matrix::CostMatrix;
use crate::segment::RouteLeg;
use crate::stop::Stop;

/// Provides the road leg between two stops.
///
/// Called concurrently from the matrix builder's worker pool, one call
/// per ordered stop pair.
pub trait SegmentProvider: Send + Sync {
    fn fetch_leg(&self, from: &Stop, to: &Stop) -> Result<RouteLeg, ProviderError>;
}

/// Estimates traffic delay for a leg when no live speed sample is cached.
///
/// Implementations must be deterministic: the same pair and distance
/// always yield the same delay.
pub trait DelayModel: Send + Sync {
    /// Extra minutes on top of the free-flow duration.
    fn delay_minutes(&self, from: &Stop, to: &Stop, distance_km: f64) -> f64;
}

/// Improves a closed tour in place of the caller's initial construction.
pub trait TourImprover {
    /// Returns a tour whose score under `weights` is never worse than
    /// `tour`'s. Endpoints stay fixed.
    fn improve(&self, tour: Vec<usize>, matrix: &CostMatrix, weights: &Weights) -> Vec<usize>;
}
