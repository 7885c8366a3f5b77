use async_trait::async_trait;
use geo_types::{Coord, LineString};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Directions, DirectionsService, Geocoder, ServiceError};
use crate::{config::RoutingConfig, entities::Coordinates, error::Error};

const PROFILE: &str = "driving-car";

/// Client for the openrouteservice.org geocoding, directions and
/// optimization endpoints.
#[derive(Clone, Debug)]
pub struct OpenRouteService {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<PointFeature>,
}

#[derive(Clone, Debug, Deserialize)]
struct PointFeature {
    geometry: PointGeometry,
}

#[derive(Clone, Debug, Deserialize)]
struct PointGeometry {
    coordinates: [f64; 2],
}

#[derive(Clone, Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    features: Vec<RouteFeature>,
}

#[derive(Clone, Debug, Deserialize)]
struct RouteFeature {
    properties: RouteProperties,
    geometry: LineGeometry,
}

#[derive(Clone, Debug, Deserialize)]
struct RouteProperties {
    #[serde(default)]
    summary: Summary,
}

// Both fields are omitted by the service for zero-length routes.
#[derive(Clone, Debug, Default, Deserialize)]
struct Summary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Clone, Debug, Deserialize)]
struct LineGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, Serialize)]
struct OptimizationRequest {
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
}

#[derive(Clone, Debug, Serialize)]
struct Job {
    id: usize,
    location: [f64; 2],
}

#[derive(Clone, Debug, Serialize)]
struct Vehicle {
    id: usize,
    profile: &'static str,
    start: [f64; 2],
}

#[derive(Clone, Debug, Deserialize)]
struct OptimizationResponse {
    #[serde(default)]
    routes: Vec<OptimizedRoute>,
    #[serde(default)]
    unassigned: Vec<serde_json::Value>,
}

#[derive(Clone, Debug, Deserialize)]
struct OptimizedRoute {
    steps: Vec<Step>,
}

#[derive(Clone, Debug, Deserialize)]
struct Step {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    job: Option<usize>,
}

impl OpenRouteService {
    pub fn new(config: &RoutingConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn key(&self) -> Result<&str, ServiceError> {
        self.api_key.as_deref().ok_or(ServiceError::NotConfigured)
    }

    fn url(&self, path: &str) -> String {
        format!("https://{}{}", self.api_base, path)
    }

    async fn post<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let key = self.key()?;

        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", key)
            .json(body)
            .send()
            .await?;

        Ok(check_status(res)?.json().await?)
    }

    #[tracing::instrument(skip(self))]
    async fn optimized_order(&self, waypoints: &[Coordinates]) -> Result<Vec<usize>, ServiceError> {
        let request = OptimizationRequest {
            jobs: waypoints
                .iter()
                .enumerate()
                .skip(1)
                .map(|(id, w)| Job {
                    id,
                    location: w.lng_lat(),
                })
                .collect(),
            vehicles: vec![Vehicle {
                id: 0,
                profile: PROFILE,
                start: waypoints[0].lng_lat(),
            }],
        };

        let data: OptimizationResponse = self.post("/optimization", &request).await?;

        job_order(data, waypoints.len())
    }
}

fn check_status(res: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status_code = res.status().as_u16();

    if (400..500).contains(&status_code) {
        return Err(ServiceError::Rejected(status_code));
    } else if status_code != 200 {
        return Err(ServiceError::Upstream(format!("status {}", status_code)));
    }

    Ok(res)
}

fn candidates(data: GeocodeResponse) -> Vec<Coordinates> {
    data.features
        .into_iter()
        .map(|feature| Coordinates::from(feature.geometry.coordinates))
        .collect()
}

/// Turns the optimizer's steps into a visiting order over all waypoints,
/// with the start (index 0) first.
fn job_order(data: OptimizationResponse, waypoint_count: usize) -> Result<Vec<usize>, ServiceError> {
    if !data.unassigned.is_empty() {
        return Err(ServiceError::Upstream(format!(
            "{} stops could not be scheduled",
            data.unassigned.len()
        )));
    }

    let route = data
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::Upstream("no route returned".into()))?;

    let mut order = vec![0];
    order.extend(
        route
            .steps
            .iter()
            .filter(|step| step.kind == "job")
            .filter_map(|step| step.job),
    );

    let mut seen = order.clone();
    seen.sort_unstable();
    if seen != (0..waypoint_count).collect::<Vec<_>>() {
        return Err(ServiceError::Upstream(
            "optimized order does not cover every stop".into(),
        ));
    }

    Ok(order)
}

fn into_directions(data: DirectionsResponse, order: Vec<usize>) -> Result<Directions, ServiceError> {
    let feature = data
        .features
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::Upstream("no route returned".into()))?;

    let geometry = LineString::new(
        feature
            .geometry
            .coordinates
            .into_iter()
            .map(|pair| Coord::from(Coordinates::from(pair)))
            .collect(),
    );

    Ok(Directions {
        order,
        distance_m: feature.properties.summary.distance,
        duration_s: feature.properties.summary.duration,
        geometry,
    })
}

#[async_trait]
impl Geocoder for OpenRouteService {
    #[tracing::instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinates>, ServiceError> {
        let key = self.key()?;

        let res = self
            .client
            .get(self.url("/geocode/search"))
            .query(&[("api_key", key)])
            .query(&[("text", address)])
            .query(&[("size", "1")])
            .send()
            .await?;

        let data: GeocodeResponse = check_status(res)?.json().await?;

        Ok(candidates(data))
    }
}

#[async_trait]
impl DirectionsService for OpenRouteService {
    #[tracing::instrument(skip(self))]
    async fn directions(
        &self,
        waypoints: &[Coordinates],
        optimize: bool,
    ) -> Result<Directions, ServiceError> {
        if waypoints.len() < 2 {
            return Err(ServiceError::Rejected(400));
        }

        let order = if optimize {
            self.optimized_order(waypoints).await?
        } else {
            (0..waypoints.len()).collect()
        };

        let coordinates: Vec<[f64; 2]> = order.iter().map(|&i| waypoints[i].lng_lat()).collect();
        let body = json!({
            "coordinates": coordinates,
            "instructions": false,
        });

        let data: DirectionsResponse = self
            .post(&format!("/v2/directions/{}/geojson", PROFILE), &body)
            .await?;

        into_directions(data, order)
    }
}
