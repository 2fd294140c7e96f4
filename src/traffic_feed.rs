//! TomTom flow-segment adapter that fills the speed-sample cache.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::error::{ConfigError, FeedError};
use crate::matrix::DEFAULT_FETCH_CONCURRENCY;
use crate::stop::{speed_key, Stop};
use crate::traffic::SpeedSample;

#[derive(Debug, Clone)]
pub struct TrafficFeedConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    /// Map zoom level the flow segment is resolved at.
    pub zoom: u8,
    /// Sample requests in flight at once.
    pub concurrency: usize,
}

impl TrafficFeedConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.tomtom.com".to_string(),
            api_key: api_key.into(),
            timeout_secs: 5,
            zoom: 10,
            concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

/// Outcome of one refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Points that had no live sample cached and were requested.
    pub requested: usize,
    pub successful: usize,
    pub failed: usize,
}

pub struct TomTomTrafficFeed {
    config: TrafficFeedConfig,
    client: reqwest::blocking::Client,
    pool: rayon::ThreadPool,
}

impl TomTomTrafficFeed {
    pub fn new(config: TrafficFeedConfig) -> Result<Self, ConfigError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.concurrency.max(1))
            .thread_name(|index| format!("traffic-feed-{}", index))
            .build()?;

        Ok(Self {
            config,
            client,
            pool,
        })
    }

    /// Fetches samples for every stop not already cached and stores the
    /// usable ones. Failures are logged and counted, never returned.
    pub fn refresh(&self, stops: &[Stop], cache: &TtlCache<SpeedSample>) -> FeedStats {
        // the depot usually closes the stop list as well as opening it
        let mut seen = HashSet::new();
        let pending: Vec<&Stop> = stops
            .iter()
            .filter(|stop| seen.insert(stop.coord_key()))
            .filter(|stop| !cache.has(&speed_key(stop.location())))
            .collect();

        if pending.is_empty() {
            debug!("traffic feed: all {} points cached", stops.len());
            return FeedStats::default();
        }

        let results: Vec<(&Stop, Result<SpeedSample, FeedError>)> = self.pool.install(|| {
            pending
                .par_iter()
                .map(|stop| (*stop, self.fetch_sample(stop)))
                .collect()
        });

        let mut stats = FeedStats {
            requested: results.len(),
            ..Default::default()
        };

        for (stop, result) in results {
            match result {
                Ok(sample) => {
                    cache.set(speed_key(stop.location()), sample);
                    stats.successful += 1;
                }
                Err(err) => {
                    warn!("traffic feed: no sample for {}: {}", stop.name, err);
                    stats.failed += 1;
                }
            }
        }

        if stats.successful == 0 {
            warn!("traffic feed: no valid samples fetched for any point");
        }

        stats
    }

    fn fetch_sample(&self, stop: &Stop) -> Result<SpeedSample, FeedError> {
        let url = format!(
            "{}/traffic/services/4/flowSegmentData/absolute/{}/json",
            self.config.base_url.trim_end_matches('/'),
            self.config.zoom
        );
        let point = format!("{},{}", stop.lat, stop.lon);

        let response = self
            .client
            .get(url)
            .query(&[("key", self.config.api_key.as_str()), ("point", point.as_str())])
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().unwrap_or_default();
            return Err(FeedError::Api { status, message });
        }

        response.json::<FlowResponse>()?.into_sample(&point)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FlowResponse {
    flow_segment_data: Option<FlowSegmentData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowSegmentData {
    current_speed: Option<f64>,
    free_flow_speed: Option<f64>,
}

impl FlowResponse {
    pub(crate) fn into_sample(self, point: &str) -> Result<SpeedSample, FeedError> {
        let data = self
            .flow_segment_data
            .ok_or_else(|| FeedError::InvalidSample(point.to_string()))?;

        match (data.current_speed, data.free_flow_speed) {
            (Some(current), Some(free_flow))
                if current.is_finite() && free_flow.is_finite() && current > 0.0 && free_flow > 0.0 =>
            {
                Ok(SpeedSample {
                    current_speed: current,
                    free_flow_speed: free_flow,
                })
            }
            _ => Err(FeedError::InvalidSample(point.to_string())),
        }
    }
}
