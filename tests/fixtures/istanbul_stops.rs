//! Delivery stops around Avcilar, Istanbul.
//!
//! The first entry is the depot (branch office); the rest are customer
//! drop-off points within a few kilometres of it.

use tour_planner::Stop;

pub const DEPOT: (&str, f64, f64) = ("Cennet Sube", 40.994600, 28.775300);

pub const DELIVERY_POINTS: &[(&str, f64, f64)] = &[
    ("Location-1", 41.0017377265273, 28.776208912671674),
    ("Location-2", 41.004619767643526, 28.78322280363494),
    ("Location-3", 41.00037372414711, 28.792933878928125),
    ("Location-4", 40.99140157967791, 28.798549052894398),
    ("Location-5", 41.0119826818897, 28.788525037442994),
    ("Location-6", 40.97668849083287, 28.79445239031416),
    ("Location-7", 41.00274090266056, 28.817164223670922),
];

/// Depot followed by every delivery point.
pub fn delivery_stops() -> Vec<Stop> {
    std::iter::once(DEPOT)
        .chain(DELIVERY_POINTS.iter().copied())
        .map(|(name, lat, lon)| Stop::new(name, lat, lon))
        .collect()
}

/// `n` stops on a line north of the depot, 0.01 degrees apart.
pub fn synthetic_stops(n: usize) -> Vec<Stop> {
    (0..n)
        .map(|i| Stop::new(format!("Stop-{}", i), DEPOT.1 + i as f64 * 0.01, DEPOT.2))
        .collect()
}
