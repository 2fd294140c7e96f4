//! Planner configuration.

use std::env;
use std::str::FromStr;

use crate::cache::CacheTtls;
use crate::cost::Weights;
use crate::error::ConfigError;
use crate::matrix::DEFAULT_FETCH_CONCURRENCY;
use crate::osrm::OsrmConfig;
use crate::traffic_feed::TrafficFeedConfig;

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub osrm: OsrmConfig,
    /// Live traffic is only fetched when a feed is configured.
    pub traffic_feed: Option<TrafficFeedConfig>,
    pub ttls: CacheTtls,
    pub weights: Weights,
    /// Threads used to fetch matrix pairs.
    pub fetch_concurrency: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            osrm: OsrmConfig::default(),
            traffic_feed: None,
            ttls: CacheTtls::default(),
            weights: Weights::default(),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

impl PlannerConfig {
    /// Reads overrides from the process environment:
    /// `OSRM_BACKEND_URL`, `OSRM_PROFILE`, `OSRM_TIMEOUT_SECS`,
    /// `TOMTOM_API_KEY`, `ROUTE_FETCH_CONCURRENCY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("OSRM_BACKEND_URL") {
            config.osrm.base_url = url;
        }
        if let Some(profile) = lookup("OSRM_PROFILE") {
            config.osrm.profile = profile;
        }
        if let Some(timeout) = parse_var(&lookup, "OSRM_TIMEOUT_SECS")? {
            config.osrm.timeout_secs = timeout;
        }
        if let Some(concurrency) = parse_var::<usize, _>(&lookup, "ROUTE_FETCH_CONCURRENCY")? {
            if concurrency == 0 {
                return Err(ConfigError::Invalid {
                    name: "ROUTE_FETCH_CONCURRENCY",
                    value: concurrency.to_string(),
                });
            }
            config.fetch_concurrency = concurrency;
        }

        let concurrency = config.fetch_concurrency;
        config.traffic_feed = lookup("TOMTOM_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(|key| TrafficFeedConfig {
                concurrency,
                ..TrafficFeedConfig::new(key)
            });

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
