//! Request-level entry point: stops in, optimized route out.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::assembler::{assemble, OptimizedRoute};
use crate::cache::Caches;
use crate::config::PlannerConfig;
use crate::congestion::{classify_geometry, span_midpoints, CongestionSpan, DEFAULT_CHUNK_SIZE};
use crate::error::{ConfigError, PlannerError};
use crate::matrix::MatrixBuilder;
use crate::optimizer::{Optimizer, TwoOpt};
use crate::osrm::OsrmClient;
use crate::polyline::Polyline;
use crate::stop::Stop;
use crate::traffic::TrafficEstimator;
use crate::traffic_feed::TomTomTrafficFeed;
use crate::traits::{SegmentProvider, TourImprover};

/// Owns the caches and collaborators for the lifetime of a service and
/// plans one route per call. Cached legs and traffic times are shared
/// between calls.
pub struct RoutePlanner<I = TwoOpt> {
    caches: Caches,
    feed: Option<TomTomTrafficFeed>,
    builder: MatrixBuilder,
    optimizer: Optimizer<I>,
}

impl RoutePlanner<TwoOpt> {
    /// Planner routing through OSRM, with live traffic when the config
    /// names a traffic feed.
    pub fn new(config: PlannerConfig) -> Result<Self, ConfigError> {
        let provider = Arc::new(OsrmClient::new(config.osrm.clone())?);
        let mut planner = Self::with_provider(provider, &config)?;
        if let Some(feed_config) = config.traffic_feed {
            planner.feed = Some(TomTomTrafficFeed::new(feed_config)?);
        }
        Ok(planner)
    }

    /// Planner over any leg provider, without a traffic feed.
    pub fn with_provider(
        provider: Arc<dyn SegmentProvider>,
        config: &PlannerConfig,
    ) -> Result<Self, ConfigError> {
        let caches = Caches::new(config.ttls);
        let estimator = TrafficEstimator::new(&caches);
        let builder = MatrixBuilder::new(provider, &caches, estimator, config.fetch_concurrency)?;

        Ok(Self {
            caches,
            feed: None,
            builder,
            optimizer: Optimizer::new(TwoOpt, config.weights),
        })
    }
}

impl<I: TourImprover> RoutePlanner<I> {
    pub fn with_traffic_feed(mut self, feed: TomTomTrafficFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Swaps the tour improvement strategy, keeping weights and caches.
    pub fn with_improver<J: TourImprover>(self, improver: J) -> RoutePlanner<J> {
        let weights = *self.optimizer.weights();
        RoutePlanner {
            caches: self.caches,
            feed: self.feed,
            builder: self.builder,
            optimizer: Optimizer::new(improver, weights),
        }
    }

    pub fn caches(&self) -> &Caches {
        &self.caches
    }

    /// Plans a closed tour over `stops`, starting and ending at `stops[0]`.
    ///
    /// Pairs that cannot be routed only degrade the result; the call fails
    /// when no stops are given, a coordinate is invalid, or no pair at all
    /// could be routed.
    pub fn plan(&self, stops: &[Stop]) -> Result<OptimizedRoute, PlannerError> {
        if stops.is_empty() {
            return Err(PlannerError::NoStops);
        }
        for stop in stops {
            stop.validate()?;
        }

        let start = Instant::now();

        if let Some(feed) = &self.feed {
            let stats = feed.refresh(stops, &self.caches.speeds);
            debug!(
                "traffic feed: {} requested, {} ok, {} failed",
                stats.requested, stats.successful, stats.failed
            );
        }

        let build = self.builder.build(stops);
        if build.all_failed() {
            return Err(PlannerError::ProviderUnavailable {
                pairs: build.pair_count(),
            });
        }

        let tour = self.optimizer.optimize(&build.matrix);
        let route = assemble(stops, &tour, &build.matrix, self.optimizer.weights());

        if route.degraded {
            warn!(
                "degraded route: {} unvisited stops, {} failed pairs",
                route.unvisited.len(),
                build.failed_pairs.len()
            );
        }
        if build.synthetic_estimates > 0 {
            debug!(
                "{} of {} pairs used synthetic traffic",
                build.synthetic_estimates,
                build.pair_count()
            );
        }

        info!(
            "planned {} stops in {:?}: {:.2} km, {:.2} min, cost {:.2}",
            stops.len(),
            start.elapsed(),
            route.metrics.total_distance,
            route.metrics.total_time,
            route.total_cost
        );

        Ok(route)
    }

    /// Congestion along a route geometry, refreshing live samples for the
    /// points it looks up when a traffic feed is configured.
    pub fn congestion(&self, geometry: &Polyline) -> Vec<CongestionSpan> {
        if let Some(feed) = &self.feed {
            let points: Vec<Stop> = span_midpoints(geometry, DEFAULT_CHUNK_SIZE)
                .into_iter()
                .map(|(lat, lon)| Stop::new("", lat, lon))
                .collect();
            feed.refresh(&points, &self.caches.speeds);
        }

        classify_geometry(geometry, &self.caches.speeds, DEFAULT_CHUNK_SIZE)
    }
}
