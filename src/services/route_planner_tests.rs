use crate::api::{OptimizeRoutesRequest, OrderingPolicy, RouteDestination, SchoolId};
use crate::models::GeoPoint;
use crate::services::route_planner::{
    plan_route, DEFAULT_SERVICE_MINUTES, DEFAULT_SETUP_MINUTES, MINUTES_PER_KM,
};

fn depot() -> GeoPoint {
    // Central kitchen, Jakarta.
    GeoPoint::new(-6.2000, 106.8000)
}

fn destination(id: i64, name: &str, lat: f64, lon: f64, portions: i32) -> RouteDestination {
    RouteDestination {
        school_id: SchoolId::new(id),
        name: name.to_string(),
        latitude: lat,
        longitude: lon,
        portions,
    }
}

/// Three schools due north of the depot at increasing distance, so the
/// distance ordering is unambiguous.
fn northbound_destinations() -> Vec<RouteDestination> {
    vec![
        destination(3, "SDN Cilandak 03", -6.05, 106.8, 250),
        destination(1, "SDN Menteng 01", -6.18, 106.8, 120),
        destination(2, "SDN Senen 02", -6.12, 106.8, 300),
    ]
}

#[test]
fn test_distance_policy_orders_by_depot_distance() {
    let request = OptimizeRoutesRequest {
        depot: depot(),
        destinations: northbound_destinations(),
        policy: OrderingPolicy::Distance,
        vehicle_id: None,
        vehicle_capacity_portions: None,
        service_minutes_per_stop: None,
        setup_minutes: None,
    };

    let plan = plan_route(&request);
    let order: Vec<i64> = plan.stops.iter().map(|s| s.school_id.value()).collect();
    assert_eq!(order, vec![1, 2, 3]);

    // Colinear layout: distance from depot must be non-decreasing.
    let depot_distances: Vec<f64> = plan.stops.iter().map(|s| s.distance_from_depot_km).collect();
    for pair in depot_distances.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[test]
fn test_demand_policy_orders_by_descending_portions() {
    let request = OptimizeRoutesRequest {
        depot: depot(),
        destinations: northbound_destinations(),
        policy: OrderingPolicy::Demand,
        vehicle_id: None,
        vehicle_capacity_portions: None,
        service_minutes_per_stop: None,
        setup_minutes: None,
    };

    let plan = plan_route(&request);
    let portions: Vec<i32> = plan.stops.iter().map(|s| s.portions).collect();
    assert_eq!(portions, vec![300, 250, 120]);
}

#[test]
fn test_alphabetical_policy_is_case_insensitive() {
    let mut destinations = northbound_destinations();
    destinations[0].name = "sdn cilandak 03".to_string();

    let request = OptimizeRoutesRequest {
        depot: depot(),
        destinations,
        policy: OrderingPolicy::Alphabetical,
        vehicle_id: None,
        vehicle_capacity_portions: None,
        service_minutes_per_stop: None,
        setup_minutes: None,
    };

    let plan = plan_route(&request);
    let order: Vec<i64> = plan.stops.iter().map(|s| s.school_id.value()).collect();
    assert_eq!(order, vec![3, 1, 2]);
}

#[test]
fn test_cumulative_metrics_accumulate_along_route() {
    let request = OptimizeRoutesRequest {
        depot: depot(),
        destinations: northbound_destinations(),
        policy: OrderingPolicy::Distance,
        vehicle_id: None,
        vehicle_capacity_portions: None,
        service_minutes_per_stop: None,
        setup_minutes: None,
    };

    let plan = plan_route(&request);
    assert_eq!(plan.stops.len(), 3);

    let legs: f64 = plan.stops.iter().map(|s| s.leg_distance_km).sum();
    assert!((legs - plan.total_distance_km).abs() < 1e-9);

    let last = plan.stops.last().unwrap();
    assert!((last.cumulative_distance_km - plan.total_distance_km).abs() < 1e-9);
    assert_eq!(last.cumulative_portions, plan.total_portions);
    assert_eq!(plan.total_portions, 670);

    // Sequences are 1-based and contiguous.
    let sequences: Vec<i32> = plan.stops.iter().map(|s| s.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3]);

    // First arrival = setup + first leg travel.
    let first = &plan.stops[0];
    let expected = DEFAULT_SETUP_MINUTES + first.leg_distance_km * MINUTES_PER_KM;
    assert!((first.estimated_arrival_minutes - expected).abs() < 1e-9);

    // Total duration = setup + travel + service at every stop.
    let expected_total =
        DEFAULT_SETUP_MINUTES + legs * MINUTES_PER_KM + 3.0 * DEFAULT_SERVICE_MINUTES;
    assert!((plan.total_duration_minutes - expected_total).abs() < 1e-9);
}

#[test]
fn test_arrivals_are_monotonically_increasing() {
    let request = OptimizeRoutesRequest {
        depot: depot(),
        destinations: northbound_destinations(),
        policy: OrderingPolicy::Demand,
        vehicle_id: None,
        vehicle_capacity_portions: None,
        service_minutes_per_stop: None,
        setup_minutes: None,
    };

    let plan = plan_route(&request);
    let arrivals: Vec<f64> = plan
        .stops
        .iter()
        .map(|s| s.estimated_arrival_minutes)
        .collect();
    for pair in arrivals.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn test_empty_destinations_yield_empty_plan() {
    let request = OptimizeRoutesRequest {
        depot: depot(),
        destinations: vec![],
        policy: OrderingPolicy::Distance,
        vehicle_id: None,
        vehicle_capacity_portions: None,
        service_minutes_per_stop: None,
        setup_minutes: None,
    };

    let plan = plan_route(&request);
    assert!(plan.stops.is_empty());
    assert_eq!(plan.total_distance_km, 0.0);
    assert_eq!(plan.total_duration_minutes, 0.0);
    assert_eq!(plan.total_portions, 0);
    assert!(plan.recommendations.is_empty());
}

#[test]
fn test_capacity_overflow_recommendation() {
    let request = OptimizeRoutesRequest {
        depot: depot(),
        destinations: northbound_destinations(),
        policy: OrderingPolicy::Distance,
        vehicle_id: None,
        vehicle_capacity_portions: Some(300),
        service_minutes_per_stop: None,
        setup_minutes: None,
    };

    // 670 portions against capacity 300 -> 3 trips.
    let plan = plan_route(&request);
    assert_eq!(plan.recommendations.len(), 1);
    assert!(plan.recommendations[0].contains("670"));
    assert!(plan.recommendations[0].contains("3 trips"));
}

#[test]
fn test_sufficient_capacity_has_no_recommendation() {
    let request = OptimizeRoutesRequest {
        depot: depot(),
        destinations: northbound_destinations(),
        policy: OrderingPolicy::Distance,
        vehicle_id: None,
        vehicle_capacity_portions: Some(1000),
        service_minutes_per_stop: None,
        setup_minutes: None,
    };

    let plan = plan_route(&request);
    assert!(plan.recommendations.is_empty());
}

#[test]
fn test_holding_time_recommendation() {
    // A single faraway stop: ~118 km => ~236 min travel, plus 15 setup and
    // 10 service pushes past the 240-minute window.
    let request = OptimizeRoutesRequest {
        depot: depot(),
        destinations: vec![destination(9, "SDN Bandung 01", -6.9175, 107.6191, 100)],
        policy: OrderingPolicy::Distance,
        vehicle_id: None,
        vehicle_capacity_portions: None,
        service_minutes_per_stop: None,
        setup_minutes: None,
    };

    let plan = plan_route(&request);
    assert!(plan.total_duration_minutes > 240.0);
    assert_eq!(plan.recommendations.len(), 1);
    assert!(plan.recommendations[0].contains("warm-holding"));
}

#[test]
fn test_custom_service_and_setup_minutes() {
    let request = OptimizeRoutesRequest {
        depot: depot(),
        destinations: northbound_destinations(),
        policy: OrderingPolicy::Distance,
        vehicle_id: None,
        vehicle_capacity_portions: None,
        service_minutes_per_stop: Some(0.0),
        setup_minutes: Some(0.0),
    };

    let plan = plan_route(&request);
    let expected = plan.total_distance_km * MINUTES_PER_KM;
    assert!((plan.total_duration_minutes - expected).abs() < 1e-9);
}

#[test]
fn test_plan_serializes_to_json() {
    let request = OptimizeRoutesRequest {
        depot: depot(),
        destinations: northbound_destinations(),
        policy: OrderingPolicy::Distance,
        vehicle_id: None,
        vehicle_capacity_portions: None,
        service_minutes_per_stop: None,
        setup_minutes: None,
    };

    let plan = plan_route(&request);
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["policy"], "DISTANCE");
    assert_eq!(json["stops"].as_array().unwrap().len(), 3);
}
