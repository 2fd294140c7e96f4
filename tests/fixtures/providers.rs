//! Leg providers for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use tour_planner::error::ProviderError;
use tour_planner::polyline::Polyline;
use tour_planner::segment::{Instruction, RouteLeg};
use tour_planner::traits::SegmentProvider;
use tour_planner::Stop;

/// Serves legs from a table indexed by stop position.
pub struct TableProvider {
    stops: Vec<Stop>,
    default_leg: (f64, f64),
    legs: HashMap<(usize, usize), (f64, f64)>,
    failing: HashSet<(usize, usize)>,
    calls: AtomicUsize,
}

impl TableProvider {
    /// Every pair costs `distance_km` and `duration_minutes` unless
    /// overridden.
    pub fn uniform(stops: &[Stop], distance_km: f64, duration_minutes: f64) -> Self {
        Self {
            stops: stops.to_vec(),
            default_leg: (distance_km, duration_minutes),
            legs: HashMap::new(),
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_leg(mut self, from: usize, to: usize, distance_km: f64, duration_minutes: f64) -> Self {
        self.legs.insert((from, to), (distance_km, duration_minutes));
        self
    }

    pub fn failing(mut self, from: usize, to: usize) -> Self {
        self.failing.insert((from, to));
        self
    }

    /// Failing every leg out of and into `stop`.
    pub fn isolating(mut self, stop: usize) -> Self {
        for other in 0..self.stops.len() {
            if other != stop {
                self.failing.insert((stop, other));
                self.failing.insert((other, stop));
            }
        }
        self
    }

    /// Number of `fetch_leg` calls served so far, failures included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn index_of(&self, stop: &Stop) -> usize {
        self.stops
            .iter()
            .position(|candidate| candidate.location() == stop.location())
            .expect("stop belongs to the table")
    }
}

impl SegmentProvider for TableProvider {
    fn fetch_leg(&self, from: &Stop, to: &Stop) -> Result<RouteLeg, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let pair = (self.index_of(from), self.index_of(to));

        if self.failing.contains(&pair) {
            return Err(ProviderError::NoRoute(format!("{} -> {}", from.name, to.name)));
        }

        let (distance_km, duration_minutes) = self.legs.get(&pair).copied().unwrap_or(self.default_leg);
        let geometry = Polyline::new(vec![from.location(), to.location()]);

        Ok(RouteLeg {
            distance_km,
            duration_minutes,
            instructions: vec![Instruction {
                text: format!("Drive from {} to {}", from.name, to.name),
                geometry: geometry.clone(),
            }],
            geometry,
        })
    }
}

/// A provider whose backend is down.
pub struct DownProvider;

impl SegmentProvider for DownProvider {
    fn fetch_leg(&self, _from: &Stop, _to: &Stop) -> Result<RouteLeg, ProviderError> {
        Err(ProviderError::Api {
            status: 503,
            message: "Service Unavailable".to_string(),
        })
    }
}
