//! Route optimization types for the distribution logistics endpoint.

use serde::{Deserialize, Serialize};

use crate::api::{SchoolId, VehicleId};
use crate::models::GeoPoint;

/// Policy used to order the delivery stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderingPolicy {
    /// Ascending great-circle distance from the depot.
    #[default]
    Distance,
    /// Descending portion demand.
    Demand,
    /// Case-insensitive school name.
    Alphabetical,
}

/// One destination school with its demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDestination {
    pub school_id: SchoolId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Meal portions to deliver.
    pub portions: i32,
}

impl RouteDestination {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Request body for `POST /v1/distributions/optimize-routes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRoutesRequest {
    /// Kitchen/depot departure point.
    pub depot: GeoPoint,
    pub destinations: Vec<RouteDestination>,
    #[serde(default)]
    pub policy: OrderingPolicy,
    /// Capacity of the assigned vehicle, if known. Used only for advisory
    /// recommendations; no capacity constraint is enforced.
    #[serde(default)]
    pub vehicle_id: Option<VehicleId>,
    #[serde(default)]
    pub vehicle_capacity_portions: Option<i32>,
    /// Unloading/handover time per stop in minutes (default 10).
    #[serde(default)]
    pub service_minutes_per_stop: Option<f64>,
    /// Loading/preparation time before departure in minutes (default 15).
    #[serde(default)]
    pub setup_minutes: Option<f64>,
}

/// One planned stop with cumulative travel metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStop {
    pub school_id: SchoolId,
    pub name: String,
    /// 1-based visiting order.
    pub sequence: i32,
    pub portions: i32,
    /// Distance from the previous point on the route (depot for the first
    /// stop), in kilometers.
    pub leg_distance_km: f64,
    /// Distance travelled from the depot along the route, in kilometers.
    pub cumulative_distance_km: f64,
    /// Straight-line distance from the depot, in kilometers.
    pub distance_from_depot_km: f64,
    /// Estimated arrival as minutes after departure from the depot,
    /// including setup and earlier service times.
    pub estimated_arrival_minutes: f64,
    /// Portions delivered up to and including this stop.
    pub cumulative_portions: i32,
}

/// The advisory route plan returned by the optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlan {
    pub policy: OrderingPolicy,
    pub stops: Vec<RouteStop>,
    pub total_distance_km: f64,
    /// Setup + travel + per-stop service time, in minutes.
    pub total_duration_minutes: f64,
    pub total_portions: i32,
    /// Human-readable advisory notes (capacity, holding time).
    pub recommendations: Vec<String>,
}
