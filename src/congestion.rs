//! Congestion levels along a route geometry.

use serde::Serialize;

use crate::cache::TtlCache;
use crate::polyline::Polyline;
use crate::stop::speed_key;
use crate::traffic::SpeedSample;

/// Points per chunk when none is given.
pub const DEFAULT_CHUNK_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Free,
    Moderate,
    Heavy,
    /// No live sample cached for the chunk's midpoint.
    Unknown,
}

impl CongestionLevel {
    /// Classifies by how fast traffic moves relative to free flow.
    pub fn from_sample(sample: &SpeedSample) -> Self {
        let speed_ratio = sample.current_speed / sample.free_flow_speed;
        if speed_ratio < 0.5 {
            CongestionLevel::Heavy
        } else if speed_ratio < 0.8 {
            CongestionLevel::Moderate
        } else {
            CongestionLevel::Free
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CongestionSpan {
    pub positions: Polyline,
    pub level: CongestionLevel,
}

/// Splits `geometry` into spans starting every `chunk_size` points, each
/// sharing its last point with the next span, and classifies each by the
/// sample cached for its midpoint.
pub fn classify_geometry(
    geometry: &Polyline,
    speeds: &TtlCache<SpeedSample>,
    chunk_size: usize,
) -> Vec<CongestionSpan> {
    spans(geometry.points(), chunk_size)
        .map(|chunk| {
            let level = speeds
                .get(&speed_key(midpoint(chunk)))
                .map(|sample| CongestionLevel::from_sample(&sample))
                .unwrap_or(CongestionLevel::Unknown);

            CongestionSpan {
                positions: Polyline::new(chunk.to_vec()),
                level,
            }
        })
        .collect()
}

/// The points whose samples [`classify_geometry`] looks up.
pub fn span_midpoints(geometry: &Polyline, chunk_size: usize) -> Vec<(f64, f64)> {
    spans(geometry.points(), chunk_size).map(midpoint).collect()
}

fn spans(points: &[(f64, f64)], chunk_size: usize) -> impl Iterator<Item = &[(f64, f64)]> {
    let chunk_size = chunk_size.max(1);
    (0..points.len().saturating_sub(1))
        .step_by(chunk_size)
        .map(move |start| &points[start..(start + chunk_size + 1).min(points.len())])
}

fn midpoint(chunk: &[(f64, f64)]) -> (f64, f64) {
    chunk[chunk.len() / 2]
}
