//! Error types.
//!
//! Per-pair routing failures never escape the matrix builder; they are
//! turned into sentinel segments there. Only [`PlannerError`] reaches callers.

use thiserror::Error;

/// A routing provider could not produce a leg for one stop pair.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("no route found: {0}")]
    NoRoute(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The traffic feed could not refresh speed samples.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("unusable speed sample for {0}")]
    InvalidSample(String),
}

/// Configuration could not be read or is inconsistent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Request-level failures.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("no stops supplied")]
    NoStops,

    #[error("invalid coordinates for stop {name:?}: ({lat}, {lon})")]
    InvalidCoordinate { name: String, lat: f64, lon: f64 },

    #[error("routing provider unavailable: all {pairs} stop pairs failed")]
    ProviderUnavailable { pairs: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
