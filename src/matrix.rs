//! Pairwise cost matrix construction.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::cache::{Caches, TtlCache};
use crate::error::{ConfigError, ProviderError};
use crate::polyline::Polyline;
use crate::segment::{RouteLeg, Segment};
use crate::stop::{route_key, Stop};
use crate::traffic::{TrafficEstimator, TrafficSource};
use crate::traits::SegmentProvider;

/// Default number of pair lookups in flight at once.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 16;

/// Dense N×N matrix of directed segments, stored row-major.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    size: usize,
    cells: Vec<Segment>,
}

impl CostMatrix {
    /// Matrix of `size` stops with zero diagonal and unreachable elsewhere.
    pub fn new(size: usize) -> Self {
        let cells = (0..size * size)
            .map(|cell| {
                if cell / size.max(1) == cell % size.max(1) {
                    Segment::identity()
                } else {
                    Segment::unreachable()
                }
            })
            .collect();
        Self { size, cells }
    }

    /// Builds a matrix from `(distance_km, traffic_minutes)` rows without
    /// geometry. Handy for offline problems and tests.
    pub fn from_costs(rows: &[Vec<(f64, f64)>]) -> Self {
        let mut matrix = Self::new(rows.len());
        for (i, row) in rows.iter().enumerate() {
            for (j, &(distance_km, traffic_minutes)) in row.iter().enumerate() {
                matrix.set(
                    i,
                    j,
                    Segment {
                        distance_km,
                        traffic_minutes,
                        geometry: Polyline::default(),
                        instructions: Vec::new(),
                        traffic_source: TrafficSource::None,
                    },
                );
            }
        }
        matrix
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, from: usize, to: usize) -> &Segment {
        &self.cells[from * self.size + to]
    }

    pub fn set(&mut self, from: usize, to: usize, segment: Segment) {
        self.cells[from * self.size + to] = segment;
    }
}

/// A built matrix plus what went wrong while building it.
#[derive(Debug, Clone)]
pub struct MatrixBuild {
    pub matrix: CostMatrix,
    /// Ordered pairs whose leg could not be fetched; their cells hold the
    /// unreachable sentinel.
    pub failed_pairs: Vec<(usize, usize)>,
    /// Number of cells whose traffic time came from the synthetic fallback.
    pub synthetic_estimates: usize,
}

impl MatrixBuild {
    pub fn pair_count(&self) -> usize {
        let n = self.matrix.size();
        n * n.saturating_sub(1)
    }

    pub fn all_failed(&self) -> bool {
        self.pair_count() > 0 && self.failed_pairs.len() == self.pair_count()
    }
}

/// Fetches and prices every ordered stop pair concurrently.
pub struct MatrixBuilder {
    provider: Arc<dyn SegmentProvider>,
    routes: Arc<TtlCache<RouteLeg>>,
    estimator: TrafficEstimator,
    pool: rayon::ThreadPool,
}

impl MatrixBuilder {
    pub fn new(
        provider: Arc<dyn SegmentProvider>,
        caches: &Caches,
        estimator: TrafficEstimator,
        concurrency: usize,
    ) -> Result<Self, ConfigError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(concurrency.max(1))
            .thread_name(|index| format!("matrix-fetch-{}", index))
            .build()?;

        Ok(Self {
            provider,
            routes: Arc::clone(&caches.routes),
            estimator,
            pool,
        })
    }

    /// Builds the full matrix. Returns only after every pair has resolved;
    /// a failing pair becomes the unreachable sentinel and does not affect
    /// the others.
    pub fn build(&self, stops: &[Stop]) -> MatrixBuild {
        let start = Instant::now();
        let n = stops.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .collect();

        let resolved: Vec<((usize, usize), Result<Segment, ProviderError>)> =
            self.pool.install(|| {
                pairs
                    .par_iter()
                    .map(|&(i, j)| ((i, j), self.segment_for(&stops[i], &stops[j])))
                    .collect()
            });

        let mut matrix = CostMatrix::new(n);
        let mut failed_pairs = Vec::new();
        let mut synthetic_estimates = 0;

        for ((i, j), result) in resolved {
            match result {
                Ok(segment) => {
                    if segment.traffic_source == TrafficSource::Synthetic {
                        synthetic_estimates += 1;
                    }
                    matrix.set(i, j, segment);
                }
                Err(err) => {
                    warn!(
                        "failed to route {} -> {}: {}",
                        stops[i].name, stops[j].name, err
                    );
                    failed_pairs.push((i, j));
                }
            }
        }

        debug!(
            "built {}x{} matrix in {:?} ({} failed pairs)",
            n,
            n,
            start.elapsed(),
            failed_pairs.len()
        );

        MatrixBuild {
            matrix,
            failed_pairs,
            synthetic_estimates,
        }
    }

    fn segment_for(&self, from: &Stop, to: &Stop) -> Result<Segment, ProviderError> {
        let leg = self.leg_for(from, to)?;
        let traffic = self.estimator.estimate(from, to, &leg);
        Ok(Segment::from_leg(leg, traffic))
    }

    fn leg_for(&self, from: &Stop, to: &Stop) -> Result<RouteLeg, ProviderError> {
        let key = route_key(from, to);
        if let Some(leg) = self.routes.get(&key) {
            debug!("route cache hit: {}", key);
            return Ok(leg);
        }

        let leg = self.provider.fetch_leg(from, to)?;
        self.routes.set(key, leg.clone());
        Ok(leg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matrix_layout() {
        let matrix = CostMatrix::new(3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(matrix.get(i, j).is_unreachable(), i != j);
            }
        }
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = CostMatrix::new(0);
        assert_eq!(matrix.size(), 0);
    }

    #[test]
    fn test_from_costs_is_directional() {
        let matrix = CostMatrix::from_costs(&[
            vec![(0.0, 0.0), (1.0, 2.0)],
            vec![(3.0, 4.0), (0.0, 0.0)],
        ]);
        assert_eq!(matrix.get(0, 1).traffic_minutes, 2.0);
        assert_eq!(matrix.get(1, 0).traffic_minutes, 4.0);
    }
}
