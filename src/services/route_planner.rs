//! Distribution route sequencing and metrics estimation.
//!
//! Given a depot and a set of destination schools with portion demand, this
//! module produces a visiting order under a selectable policy together with
//! per-stop cumulative distance/time estimates and advisory recommendations.
//!
//! This is a greedy single-pass sort, not a vehicle-routing solver: no
//! capacity or time-window constraints are enforced and the output is
//! advisory only.

use crate::api::{OptimizeRoutesRequest, OrderingPolicy, RouteDestination, RoutePlan, RouteStop};
use crate::models::{haversine_km, GeoPoint};

/// Travel time estimate per kilometer of road, in minutes.
pub const MINUTES_PER_KM: f64 = 2.0;

/// Default unloading/handover time per stop, in minutes.
pub const DEFAULT_SERVICE_MINUTES: f64 = 10.0;

/// Default loading/preparation time before departure, in minutes.
pub const DEFAULT_SETUP_MINUTES: f64 = 15.0;

/// Warm-holding window for cooked meals, in minutes. Routes estimated to run
/// longer than this trigger a food-safety recommendation.
pub const WARM_HOLDING_LIMIT_MINUTES: f64 = 240.0;

/// Order the destinations according to the requested policy.
///
/// Ties are broken by case-insensitive name so the ordering is deterministic
/// regardless of input order.
fn order_destinations(
    depot: &GeoPoint,
    destinations: &[RouteDestination],
    policy: OrderingPolicy,
) -> Vec<RouteDestination> {
    let mut ordered: Vec<RouteDestination> = destinations.to_vec();
    match policy {
        OrderingPolicy::Distance => {
            ordered.sort_by(|a, b| {
                let da = haversine_km(depot, &a.location());
                let db = haversine_km(depot, &b.location());
                da.partial_cmp(&db)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            });
        }
        OrderingPolicy::Demand => {
            ordered.sort_by(|a, b| {
                b.portions
                    .cmp(&a.portions)
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            });
        }
        OrderingPolicy::Alphabetical => {
            ordered.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.school_id.cmp(&b.school_id))
            });
        }
    }
    ordered
}

/// Compute the advisory route plan for one delivery run.
///
/// Legs run depot → stop 1 → stop 2 → …; the return leg to the depot is not
/// counted. Travel time is estimated as `distance_km * 2` minutes on top of a
/// fixed setup time and a fixed service time per stop.
pub fn plan_route(request: &OptimizeRoutesRequest) -> RoutePlan {
    let service_minutes = request
        .service_minutes_per_stop
        .unwrap_or(DEFAULT_SERVICE_MINUTES);
    let setup_minutes = request.setup_minutes.unwrap_or(DEFAULT_SETUP_MINUTES);

    let ordered = order_destinations(&request.depot, &request.destinations, request.policy);

    let mut stops = Vec::with_capacity(ordered.len());
    let mut previous = request.depot;
    let mut cumulative_distance_km = 0.0;
    let mut elapsed_minutes = setup_minutes;
    let mut cumulative_portions: i32 = 0;

    for (index, destination) in ordered.iter().enumerate() {
        let location = destination.location();
        let leg_distance_km = haversine_km(&previous, &location);
        cumulative_distance_km += leg_distance_km;
        elapsed_minutes += leg_distance_km * MINUTES_PER_KM;
        cumulative_portions += destination.portions;

        stops.push(RouteStop {
            school_id: destination.school_id,
            name: destination.name.clone(),
            sequence: (index + 1) as i32,
            portions: destination.portions,
            leg_distance_km,
            cumulative_distance_km,
            distance_from_depot_km: haversine_km(&request.depot, &location),
            estimated_arrival_minutes: elapsed_minutes,
            cumulative_portions,
        });

        // Service happens after arrival, before departing for the next stop.
        elapsed_minutes += service_minutes;
        previous = location;
    }

    let total_portions = cumulative_portions;
    let total_duration_minutes = if stops.is_empty() {
        0.0
    } else {
        elapsed_minutes
    };

    let recommendations = build_recommendations(
        request.vehicle_capacity_portions,
        total_portions,
        total_duration_minutes,
    );

    RoutePlan {
        policy: request.policy,
        stops,
        total_distance_km: cumulative_distance_km,
        total_duration_minutes,
        total_portions,
        recommendations,
    }
}

fn build_recommendations(
    vehicle_capacity: Option<i32>,
    total_portions: i32,
    total_duration_minutes: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if let Some(capacity) = vehicle_capacity {
        if capacity > 0 && total_portions > capacity {
            let trips = (total_portions + capacity - 1) / capacity;
            recommendations.push(format!(
                "Total demand of {} portions exceeds the vehicle capacity of {}; \
                 plan at least {} trips or assign an additional vehicle.",
                total_portions, capacity, trips
            ));
        }
    }

    if total_duration_minutes > WARM_HOLDING_LIMIT_MINUTES {
        recommendations.push(format!(
            "Estimated route duration of {:.0} minutes exceeds the {:.0}-minute \
             warm-holding window; split the route to keep meals within the safe \
             serving time.",
            total_duration_minutes, WARM_HOLDING_LIMIT_MINUTES
        ));
    }

    recommendations
}

#[cfg(test)]
#[path = "route_planner_tests.rs"]
mod route_planner_tests;
