use serde::Serialize;
use thiserror::Error;

use super::resolver::{resolve, Reason, ResolutionError};
use crate::entities::{Coordinates, Customer, RoutePlan, Waypoint};
use crate::external::{DirectionsService, Geocoder, ServiceError};

/// Waypoint count (origin included) from which the service may reorder stops.
pub const OPTIMIZE_THRESHOLD: usize = 4;

pub const ORIGIN_LABEL: &str = "Origem";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Origin,
    Stop,
    Directions,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum Cause {
    #[error("select at least one customer to visit")]
    NoStops,
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("could not compute the route: {0}")]
    Directions(#[from] ServiceError),
}

#[derive(Clone, Debug, PartialEq, Error)]
#[error("{cause}")]
pub struct RouteError {
    pub stage: Stage,
    #[source]
    pub cause: Cause,
}

impl RouteError {
    pub fn is_not_configured(&self) -> bool {
        match &self.cause {
            Cause::Resolution(err) => err.reason == Reason::NotConfigured,
            Cause::Directions(err) => *err == ServiceError::NotConfigured,
            Cause::NoStops => false,
        }
    }
}

pub fn should_optimize(waypoint_count: usize) -> bool {
    waypoint_count >= OPTIMIZE_THRESHOLD
}

/// Resolves the origin and every stop, then asks for a driving route through
/// them. Any address that fails to resolve aborts the whole request.
#[tracing::instrument(skip(geocoder, directions, stops), fields(stops = stops.len()))]
pub async fn plan_route(
    geocoder: &(dyn Geocoder + Send + Sync),
    directions: &(dyn DirectionsService + Send + Sync),
    origin: &str,
    stops: &[Customer],
) -> Result<RoutePlan, RouteError> {
    if stops.is_empty() {
        return Err(RouteError {
            stage: Stage::Stop,
            cause: Cause::NoStops,
        });
    }

    tracing::debug!("resolving");

    let origin = resolve(geocoder, ORIGIN_LABEL, origin)
        .await
        .map_err(|err| {
            tracing::warn!("origin not resolved: {}", err);
            RouteError {
                stage: Stage::Origin,
                cause: err.into(),
            }
        })?;

    let mut waypoints = vec![Waypoint {
        label: ORIGIN_LABEL.into(),
        coordinates: origin,
    }];

    for customer in stops {
        let coordinates = resolve(geocoder, &customer.name, &customer.address)
            .await
            .map_err(|err| {
                tracing::warn!("stop not resolved: {}", err);
                RouteError {
                    stage: Stage::Stop,
                    cause: err.into(),
                }
            })?;

        waypoints.push(Waypoint {
            label: customer.name.clone(),
            coordinates,
        });
    }

    tracing::debug!("requesting");

    let optimize = should_optimize(waypoints.len());
    let coordinates: Vec<Coordinates> = waypoints.iter().map(|w| w.coordinates).collect();

    let route = directions
        .directions(&coordinates, optimize)
        .await
        .map_err(|err| {
            tracing::warn!("directions failed: {}", err);
            RouteError {
                stage: Stage::Directions,
                cause: err.into(),
            }
        })?;

    let waypoints = if optimize {
        reorder(waypoints, &route.order).ok_or_else(|| RouteError {
            stage: Stage::Directions,
            cause: Cause::Directions(ServiceError::Upstream(
                "returned order does not match the requested waypoints".into(),
            )),
        })?
    } else {
        waypoints
    };

    let plan = RoutePlan {
        waypoints,
        total_distance_km: route.distance_m / 1000.0,
        total_duration_min: route.duration_s / 60.0,
        geometry: route.geometry,
        optimized: optimize,
    };

    tracing::info!(
        waypoints = plan.waypoints.len(),
        km = plan.total_distance_km,
        min = plan.total_duration_min,
        "route ready"
    );

    Ok(plan)
}

/// Applies a visiting order, which must start at the origin and name every
/// waypoint exactly once.
fn reorder(waypoints: Vec<Waypoint>, order: &[usize]) -> Option<Vec<Waypoint>> {
    if order.len() != waypoints.len() || order.first() != Some(&0) {
        return None;
    }

    let mut slots: Vec<Option<Waypoint>> = waypoints.into_iter().map(Some).collect();

    order
        .iter()
        .map(|&i| slots.get_mut(i).and_then(Option::take))
        .collect()
}
