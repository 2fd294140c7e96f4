//! End-to-end planner tests
//!
//! Runs the whole pipeline over offline providers: validation, matrix,
//! optimization, assembly, and the request-level error cases.

mod fixtures;

use std::sync::Arc;

use tour_planner::config::PlannerConfig;
use tour_planner::congestion::CongestionLevel;
use tour_planner::cost::Weights;
use tour_planner::haversine::HaversineProvider;
use tour_planner::matrix::CostMatrix;
use tour_planner::optimizer::is_complete_tour;
use tour_planner::stop::speed_key;
use tour_planner::traffic::SpeedSample;
use tour_planner::traits::TourImprover;
use tour_planner::{PlannerError, RoutePlanner, Stop};

use fixtures::{delivery_stops, synthetic_stops, DownProvider, TableProvider};

fn haversine_planner() -> RoutePlanner {
    RoutePlanner::with_provider(Arc::new(HaversineProvider::default()), &PlannerConfig::default())
        .unwrap()
}

fn tour_indices(route: &tour_planner::OptimizedRoute) -> Vec<usize> {
    route.tour.iter().map(|stop| stop.index).collect()
}

#[test]
fn plans_complete_tour_over_delivery_stops() {
    let stops = delivery_stops();
    let route = haversine_planner().plan(&stops).unwrap();

    let tour = tour_indices(&route);
    assert!(is_complete_tour(&tour, stops.len()), "tour {:?}", tour);
    assert_eq!(route.tour[0].name, "Cennet Sube");
    assert_eq!(route.segments.len(), stops.len());
    assert!(!route.degraded);
    assert!(route.unvisited.is_empty());
    assert_eq!(route.synthetic_traffic_legs, stops.len());

    // two-point geometry and one instruction per haversine leg
    assert_eq!(route.geometry.len(), 2 * stops.len());
    assert_eq!(route.instructions.len(), stops.len());
    assert_eq!(route.instructions.last().unwrap().text, "Head to Cennet Sube");
}

#[test]
fn totals_agree_with_leg_summaries() {
    let route = haversine_planner().plan(&delivery_stops()).unwrap();
    let weights = Weights::default();

    let distance: f64 = route.segments.iter().map(|leg| leg.distance).sum();
    let time: f64 = route.segments.iter().map(|leg| leg.traffic_time).sum();

    assert!((route.metrics.total_distance - distance).abs() < 1e-9);
    assert!((route.metrics.total_time - time).abs() < 1e-9);
    assert!(
        (route.total_cost
            - (weights.distance * route.metrics.total_distance
                + weights.traffic_time * route.metrics.total_time))
            .abs()
            < 1e-9
    );
    assert_eq!(route.metrics.total_cost, route.total_cost);
}

#[test]
fn repeated_plans_are_identical() {
    let planner = haversine_planner();
    let stops = delivery_stops();

    let first = planner.plan(&stops).unwrap();
    let second = planner.plan(&stops).unwrap();

    assert_eq!(tour_indices(&first), tour_indices(&second));
    assert_eq!(first.total_cost, second.total_cost);
}

#[test]
fn live_samples_change_traffic_fidelity() {
    let planner = haversine_planner();
    let stops = delivery_stops();
    for stop in &stops {
        planner.caches().speeds.set(
            speed_key(stop.location()),
            SpeedSample { current_speed: 20.0, free_flow_speed: 40.0 },
        );
    }

    let route = planner.plan(&stops).unwrap();

    assert_eq!(route.synthetic_traffic_legs, 0);
    // uniform 2x congestion doubles every free-flow duration
    let free_flow_minutes = route.metrics.total_distance / 40.0 * 60.0;
    assert!((route.metrics.total_time - 2.0 * free_flow_minutes).abs() < 1e-6);
}

#[test]
fn rejects_empty_stop_list() {
    assert!(matches!(haversine_planner().plan(&[]), Err(PlannerError::NoStops)));
}

#[test]
fn rejects_invalid_coordinates() {
    let mut stops = delivery_stops();
    stops[3] = Stop::new("Nowhere", 123.0, 28.8);

    match haversine_planner().plan(&stops) {
        Err(PlannerError::InvalidCoordinate { name, .. }) => assert_eq!(name, "Nowhere"),
        other => panic!("expected invalid coordinate, got {:?}", other.map(|r| r.total_cost)),
    }
}

#[test]
fn single_stop_is_trivial_tour() {
    let route = haversine_planner().plan(&synthetic_stops(1)).unwrap();
    assert_eq!(tour_indices(&route), vec![0, 0]);
    assert_eq!(route.total_cost, 0.0);
    assert!(!route.degraded);
}

#[test]
fn unreachable_provider_fails_the_request() {
    let planner =
        RoutePlanner::with_provider(Arc::new(DownProvider), &PlannerConfig::default()).unwrap();

    assert!(matches!(
        planner.plan(&synthetic_stops(4)),
        Err(PlannerError::ProviderUnavailable { pairs: 12 })
    ));
}

#[test]
fn isolated_stop_degrades_the_route() {
    let stops = synthetic_stops(5);
    let provider = Arc::new(TableProvider::uniform(&stops, 1.0, 2.0).isolating(4));
    let planner = RoutePlanner::with_provider(provider, &PlannerConfig::default()).unwrap();

    let route = planner.plan(&stops).unwrap();

    assert!(route.degraded);
    assert_eq!(route.unvisited, vec![4]);
    assert_eq!(route.tour.len(), 5);
    assert_eq!(route.tour.last().unwrap().index, 0);
    assert!(route.total_cost.is_finite());
}

#[test]
fn improver_can_be_swapped() {
    struct Keep;
    struct Reverse;

    impl TourImprover for Keep {
        fn improve(&self, tour: Vec<usize>, _matrix: &CostMatrix, _weights: &Weights) -> Vec<usize> {
            tour
        }
    }

    impl TourImprover for Reverse {
        fn improve(&self, mut tour: Vec<usize>, _matrix: &CostMatrix, _weights: &Weights) -> Vec<usize> {
            tour.reverse();
            tour
        }
    }

    let stops = delivery_stops();
    let greedy = haversine_planner().with_improver(Keep).plan(&stops).unwrap();
    let reversed = haversine_planner().with_improver(Reverse).plan(&stops).unwrap();

    let mut expected = tour_indices(&greedy);
    expected.reverse();
    assert_eq!(tour_indices(&reversed), expected);
}

#[test]
fn serialized_route_uses_wire_names() {
    let route = haversine_planner().plan(&synthetic_stops(3)).unwrap();
    let json = serde_json::to_value(&route).unwrap();

    for field in ["tour", "totalCost", "metrics", "geometry", "instructions", "segments"] {
        assert!(json.get(field).is_some(), "missing {}", field);
    }
    assert_eq!(json["tour"][0]["name"], "Stop-0");
    assert!(json["segments"][0]["trafficTime"].is_number());
    // leg summaries stay distance and time only
    assert_eq!(json["segments"][0].as_object().unwrap().len(), 2);
    assert!(json["geometry"][0].is_array());
}

#[test]
fn congestion_uses_cached_samples() {
    let planner = haversine_planner();
    let route = planner.plan(&synthetic_stops(4)).unwrap();

    let spans = planner.congestion(&route.geometry);
    assert!(!spans.is_empty());
    assert!(spans.iter().all(|span| span.level == CongestionLevel::Unknown));

    let midpoint = spans[0].positions.points()[spans[0].positions.len() / 2];
    planner.caches().speeds.set(
        speed_key(midpoint),
        SpeedSample { current_speed: 10.0, free_flow_speed: 50.0 },
    );
    assert_eq!(planner.congestion(&route.geometry)[0].level, CongestionLevel::Heavy);
}

#[test]
fn tour_score_matches_reported_cost_for_table_provider() {
    let stops = synthetic_stops(6);
    let provider = Arc::new(
        TableProvider::uniform(&stops, 4.0, 6.0)
            .with_leg(0, 3, 1.0, 1.0)
            .with_leg(3, 5, 1.0, 1.0)
            .with_leg(5, 0, 1.0, 1.0),
    );
    let planner = RoutePlanner::with_provider(provider, &PlannerConfig::default()).unwrap();

    let route = planner.plan(&stops).unwrap();
    let tour = tour_indices(&route);

    assert!(is_complete_tour(&tour, 6));
    let cheap_legs = route.segments.iter().filter(|leg| leg.distance == 1.0).count();
    assert!(cheap_legs >= 2, "only {} cheap legs in {:?}", cheap_legs, tour);
    let weights = Weights::default();
    let expected: f64 = route
        .segments
        .iter()
        .map(|leg| weights.cost(leg.distance, leg.traffic_time))
        .sum();
    assert!((route.total_cost - expected).abs() < 1e-9);
}
