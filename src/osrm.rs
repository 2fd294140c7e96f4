//! OSRM HTTP adapter for road legs.

use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, ProviderError};
use crate::instructions::{compile, StepManeuver};
use crate::polyline::Polyline;
use crate::segment::{Instruction, RouteLeg};
use crate::stop::Stop;
use crate::traits::SegmentProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, ConfigError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, from: &Stop, to: &Stop) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson&steps=true",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.lon,
            from.lat,
            to.lon,
            to.lat
        )
    }
}

impl SegmentProvider for OsrmClient {
    fn fetch_leg(&self, from: &Stop, to: &Stop) -> Result<RouteLeg, ProviderError> {
        let url = self.route_url(from, to);
        debug!("OSRM: requesting {}", url);

        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        parse_route(&response.text()?)
    }
}

/// Decodes a successful `/route` body into a leg.
pub(crate) fn parse_route(body: &str) -> Result<RouteLeg, ProviderError> {
    serde_json::from_str::<OsrmRouteResponse>(body)
        .map_err(|err| ProviderError::Malformed(err.to_string()))?
        .into_leg()
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
    geometry: Option<GeoJsonLine>,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonLine {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    #[serde(default)]
    name: String,
    maneuver: OsrmManeuver,
    geometry: Option<GeoJsonLine>,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind: String,
    modifier: Option<String>,
    exit: Option<u32>,
    bearing_after: Option<f64>,
}

impl OsrmRouteResponse {
    /// Converts the first route into a leg in kilometres and minutes.
    pub(crate) fn into_leg(self) -> Result<RouteLeg, ProviderError> {
        if self.code != "Ok" {
            return Err(ProviderError::NoRoute(
                self.message.unwrap_or(self.code),
            ));
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NoRoute("no routes in response".to_string()))?;

        if !route.distance.is_finite() || !route.duration.is_finite() {
            return Err(ProviderError::Malformed(format!(
                "non-finite distance {} or duration {}",
                route.distance, route.duration
            )));
        }

        let geometry = route
            .geometry
            .map(|line| Polyline::from_lon_lat(&line.coordinates))
            .unwrap_or_default();

        let instructions = route
            .legs
            .into_iter()
            .next()
            .map(|leg| leg.steps.into_iter().map(OsrmStep::into_instruction).collect())
            .unwrap_or_default();

        Ok(RouteLeg {
            distance_km: route.distance / 1000.0,
            duration_minutes: route.duration / 60.0,
            geometry,
            instructions,
        })
    }
}

impl OsrmStep {
    fn into_instruction(self) -> Instruction {
        let maneuver = StepManeuver {
            kind: &self.maneuver.kind,
            modifier: self.maneuver.modifier.as_deref(),
            road: &self.name,
            exit: self.maneuver.exit,
            bearing_after: self.maneuver.bearing_after,
        };
        let text = compile(&maneuver).unwrap_or_else(|| "Continue".to_string());

        Instruction {
            text,
            geometry: self
                .geometry
                .map(|line| Polyline::from_lon_lat(&line.coordinates))
                .unwrap_or_default(),
        }
    }
}
