//! tour-planner
//!
//! Orders a fixed set of delivery stops into a closed tour from the depot,
//! pricing each leg by road distance and traffic-adjusted travel time.

pub mod assembler;
pub mod cache;
pub mod config;
pub mod congestion;
pub mod cost;
pub mod error;
pub mod haversine;
pub mod instructions;
pub mod matrix;
pub mod optimizer;
pub mod osrm;
pub mod osrm_dataset;
pub mod planner;
pub mod polyline;
pub mod segment;
pub mod stop;
pub mod traffic;
pub mod traffic_feed;
pub mod traits;

pub use assembler::OptimizedRoute;
pub use error::PlannerError;
pub use planner::RoutePlanner;
pub use stop::Stop;
