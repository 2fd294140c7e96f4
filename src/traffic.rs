//! Traffic-adjusted travel times.
//!
//! Lookup order for a directed pair:
//! 1. previously computed time in the traffic-time cache,
//! 2. live speed samples for both endpoints (filled by the traffic feed),
//! 3. a deterministic synthetic delay.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::{Caches, TtlCache};
use crate::segment::RouteLeg;
use crate::stop::{speed_key, traffic_time_key, Stop};
use crate::traits::DelayModel;

/// Origin share of the combined congestion ratio; the destination gets the rest.
const ORIGIN_RATIO_WEIGHT: f64 = 0.6;

/// Upper bound on the synthetic delay, in minutes.
const MAX_SYNTHETIC_DELAY_MINUTES: f64 = 5.0;

/// Current and free-flow speed observed at a point, in km/h.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedSample {
    pub current_speed: f64,
    pub free_flow_speed: f64,
}

impl SpeedSample {
    /// How much slower than free flow traffic moves. Current speeds below
    /// 1 km/h are clamped so a standstill does not divide by zero.
    pub fn congestion_ratio(&self) -> f64 {
        self.free_flow_speed / self.current_speed.max(1.0)
    }
}

/// Where a traffic-adjusted time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficSource {
    Live,
    Synthetic,
    /// No estimate was made (identity or unreachable segment).
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficEstimate {
    pub minutes: f64,
    pub source: TrafficSource,
}

/// Repeatable pseudo-random delay derived from the endpoint coordinates.
///
/// Not a model of real traffic; it only spreads legs apart so that the
/// optimizer sees direction- and distance-dependent costs offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticDelay;

impl SyntheticDelay {
    /// Hash of the pair mapped into `[0.5, 1.0]`.
    pub fn factor(from: &Stop, to: &Stop) -> f64 {
        let hash = ((from.lat * to.lon + from.lon * to.lat).sin() * 10000.0).abs() % 1.0;
        0.5 + hash * 0.5
    }
}

impl DelayModel for SyntheticDelay {
    fn delay_minutes(&self, from: &Stop, to: &Stop, distance_km: f64) -> f64 {
        MAX_SYNTHETIC_DELAY_MINUTES.min(distance_km / 5.0 * Self::factor(from, to))
    }
}

/// Converts free-flow leg durations into traffic-adjusted ones.
pub struct TrafficEstimator {
    speeds: Arc<TtlCache<SpeedSample>>,
    estimates: Arc<TtlCache<TrafficEstimate>>,
    fallback: Box<dyn DelayModel>,
}

impl TrafficEstimator {
    pub fn new(caches: &Caches) -> Self {
        Self::with_fallback(caches, Box::new(SyntheticDelay))
    }

    pub fn with_fallback(caches: &Caches, fallback: Box<dyn DelayModel>) -> Self {
        Self {
            speeds: Arc::clone(&caches.speeds),
            estimates: Arc::clone(&caches.traffic),
            fallback,
        }
    }

    pub fn estimate(&self, from: &Stop, to: &Stop, leg: &RouteLeg) -> TrafficEstimate {
        let key = traffic_time_key(from, to);
        if let Some(cached) = self.estimates.get(&key) {
            debug!("traffic time cache hit: {}", key);
            return cached;
        }

        let estimate = match self.live_estimate(from, to, leg.duration_minutes) {
            Some(minutes) => TrafficEstimate {
                minutes,
                source: TrafficSource::Live,
            },
            None => {
                warn!(
                    "no live traffic for {} -> {}, using synthetic estimate",
                    from.name, to.name
                );
                TrafficEstimate {
                    minutes: leg.duration_minutes
                        + self.fallback.delay_minutes(from, to, leg.distance_km),
                    source: TrafficSource::Synthetic,
                }
            }
        };

        self.estimates.set(key, estimate);
        estimate
    }

    fn live_estimate(&self, from: &Stop, to: &Stop, base_minutes: f64) -> Option<f64> {
        let from_sample = self.speeds.get(&speed_key(from.location()))?;
        let to_sample = self.speeds.get(&speed_key(to.location()))?;

        let ratio = from_sample.congestion_ratio() * ORIGIN_RATIO_WEIGHT
            + to_sample.congestion_ratio() * (1.0 - ORIGIN_RATIO_WEIGHT);

        Some(base_minutes * ratio)
    }
}
