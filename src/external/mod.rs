pub mod openroute;

use std::sync::Arc;

use async_trait::async_trait;
use geo_types::LineString;
use thiserror::Error;

use crate::entities::Coordinates;

pub use openroute::OpenRouteService;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ServiceError {
    /// No credential for the routing provider.
    #[error("routing service is not configured")]
    NotConfigured,
    /// The provider refused the request (4xx).
    #[error("request rejected with status {0}")]
    Rejected(u16),
    /// The provider answered, but not with something usable.
    #[error("unexpected service response: {0}")]
    Upstream(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Upstream(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// A driving route through a fixed set of waypoints.
#[derive(Clone, Debug, PartialEq)]
pub struct Directions {
    /// Indices into the requested waypoints, in driving order.
    pub order: Vec<usize>,
    pub distance_m: f64,
    pub duration_s: f64,
    pub geometry: LineString<f64>,
}

#[async_trait]
pub trait Geocoder {
    /// Candidate positions for a free-text address, best match first.
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinates>, ServiceError>;
}

#[async_trait]
pub trait DirectionsService {
    /// The first waypoint is always kept as the start. With `optimize` the
    /// service may visit the rest in any order; otherwise the given order is driven.
    async fn directions(
        &self,
        waypoints: &[Coordinates],
        optimize: bool,
    ) -> Result<Directions, ServiceError>;
}

pub type DynGeocoder = Arc<dyn Geocoder + Send + Sync>;
pub type DynDirections = Arc<dyn DirectionsService + Send + Sync>;
