use geo_types::LineString;
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, Customer};

/// What the user asked for: where the route starts and which customers to visit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin_address: String,
    pub stops: Vec<Customer>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub label: String,
    pub coordinates: Coordinates,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Origin first, then the stops in driving order.
    pub waypoints: Vec<Waypoint>,
    pub total_distance_km: f64,
    pub total_duration_min: f64,
    pub geometry: LineString<f64>,
    pub optimized: bool,
}

impl RoutePlan {
    pub fn origin(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.waypoints.iter().map(|w| w.label.as_str()).collect()
    }
}
