//! Delivery route planning: address resolution, the directions request, the
//! per-session cache of the last plan and its presentation.

mod cache;
mod presentation;
mod requester;
mod resolver;

pub use cache::{RouteCache, RouteSelection, RouteState};
pub use presentation::{
    google_maps_link, render, summary_text, waze_link, ExternalLinks, MapView, Marker,
    MarkerStyle, RouteView,
};
pub use requester::{
    plan_route, should_optimize, Cause, RouteError, Stage, OPTIMIZE_THRESHOLD, ORIGIN_LABEL,
};
pub use resolver::{resolve, Reason, ResolutionError};

use crate::entities::{RoutePlan, RouteRequest};
use crate::external::{DirectionsService, Geocoder};

/// Plans `request` and stores the result in `cache`. A failed request leaves
/// whatever the cache held before untouched.
pub async fn generate<'c>(
    cache: &'c mut RouteCache,
    geocoder: &(dyn Geocoder + Send + Sync),
    directions: &(dyn DirectionsService + Send + Sync),
    request: &RouteRequest,
) -> Result<&'c RoutePlan, RouteError> {
    let plan = plan_route(geocoder, directions, &request.origin_address, &request.stops).await?;

    let selection = RouteSelection {
        origin: request.origin_address.clone(),
        customers: request.stops.iter().map(|c| c.name.clone()).collect(),
    };

    Ok(cache.store(selection, plan))
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeDirections, FakeGeocoder};
    use super::*;
    use crate::entities::{Coordinates, Customer};

    fn geocoder() -> FakeGeocoder {
        FakeGeocoder::with(&[
            ("A", -46.0, -23.0),
            ("Addr1", -46.1, -23.1),
            ("Addr2", -46.2, -23.2),
            ("Addr3", -46.3, -23.3),
            ("Addr4", -46.4, -23.4),
        ])
    }

    fn customers(entries: &[(&str, &str)]) -> Vec<Customer> {
        entries
            .iter()
            .map(|(name, address)| Customer::new(*name, *address))
            .collect()
    }

    #[tokio::test]
    async fn short_route_keeps_selection_order() {
        let geocoder = geocoder();
        let directions = FakeDirections::default();
        let stops = customers(&[("Bob", "Addr1"), ("Carol", "Addr2")]);

        let plan = plan_route(&geocoder, &directions, "A", &stops).await.unwrap();

        assert_eq!(plan.labels(), vec!["Origem", "Bob", "Carol"]);
        assert!(!plan.optimized);
        assert_eq!(directions.last_request().map(|(_, optimize)| optimize), Some(false));
        assert_eq!(plan.total_distance_km, 2234.0 / 1000.0);
        assert_eq!(plan.total_duration_min, 150.0 / 60.0);
        assert_eq!(summary_text(&plan), "Distância: 2.23 km | Tempo: 2.5 min");
    }

    #[tokio::test]
    async fn three_waypoints_never_optimize() {
        let geocoder = geocoder();
        let directions = FakeDirections {
            optimized_order: Some(vec![0, 2, 1]),
            ..Default::default()
        };
        let stops = customers(&[("Bob", "Addr1"), ("Carol", "Addr2")]);

        let plan = plan_route(&geocoder, &directions, "A", &stops).await.unwrap();

        assert_eq!(plan.labels(), vec!["Origem", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn long_route_keeps_service_order() {
        let geocoder = geocoder();
        let directions = FakeDirections {
            optimized_order: Some(vec![0, 3, 1, 4, 2]),
            ..Default::default()
        };
        let stops = customers(&[
            ("Bob", "Addr1"),
            ("Carol", "Addr2"),
            ("Dave", "Addr3"),
            ("Erin", "Addr4"),
        ]);

        let plan = plan_route(&geocoder, &directions, "A", &stops).await.unwrap();

        assert!(plan.optimized);
        assert_eq!(directions.last_request().map(|(_, optimize)| optimize), Some(true));
        assert_eq!(plan.labels(), vec!["Origem", "Dave", "Bob", "Erin", "Carol"]);
        assert_eq!(
            google_maps_link(&plan),
            "https://www.google.com/maps/dir/-23,-46/-23.3,-46.3/-23.1,-46.1/-23.4,-46.4/-23.2,-46.2"
        );
        assert_eq!(
            waze_link(&plan).as_deref(),
            Some("https://waze.com/ul?ll=-23.2,-46.2&navigate=yes")
        );
    }

    #[tokio::test]
    async fn waypoint_count_is_stops_plus_origin() {
        let geocoder = geocoder();
        let directions = FakeDirections::default();
        let stops = customers(&[("Bob", "Addr1"), ("Carol", "Addr2"), ("Dave", "Addr3")]);

        let plan = plan_route(&geocoder, &directions, "A", &stops).await.unwrap();

        assert_eq!(plan.waypoints.len(), stops.len() + 1);
        assert_eq!(google_maps_link(&plan).matches(',').count(), stops.len() + 1);
        assert_eq!(
            plan.origin().map(|w| w.coordinates),
            Some(Coordinates::new(-46.0, -23.0))
        );
    }

    #[tokio::test]
    async fn unknown_origin_fails_at_origin_stage() {
        let geocoder = geocoder();
        let directions = FakeDirections::default();
        let stops = customers(&[("Bob", "Addr1")]);

        let err = plan_route(&geocoder, &directions, "nowhere", &stops)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Origin);
        assert!(matches!(
            err.cause,
            Cause::Resolution(ResolutionError { reason: Reason::NotFound, .. })
        ));
        assert_eq!(geocoder.call_count(), 1);
        assert!(directions.last_request().is_none());
    }

    #[tokio::test]
    async fn unknown_stop_aborts_the_whole_route() {
        let geocoder = geocoder();
        let directions = FakeDirections::default();
        let stops = customers(&[("Bob", "Addr1"), ("Carol", "missing"), ("Dave", "Addr3")]);

        let err = plan_route(&geocoder, &directions, "A", &stops)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Stop);
        match err.cause {
            Cause::Resolution(resolution) => {
                assert_eq!(resolution.label, "Carol");
                assert_eq!(resolution.address, "missing");
            }
            other => panic!("unexpected cause: {:?}", other),
        }
        assert!(directions.last_request().is_none());
    }

    #[tokio::test]
    async fn route_errors_chain_to_their_cause() {
        use std::error::Error as _;

        let geocoder = geocoder();
        let directions = FakeDirections::default();
        let stops = customers(&[("Carol", "missing")]);

        let err = plan_route(&geocoder, &directions, "A", &stops)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "could not locate address for Carol: \"missing\"");
        let source = err.source().map(|cause| cause.to_string());
        assert_eq!(source, Some(err.to_string()));

        let failing = FakeDirections {
            fail: true,
            ..Default::default()
        };
        let stops = customers(&[("Bob", "Addr1")]);
        let err = plan_route(&geocoder, &failing, "A", &stops)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("could not compute the route: "));
        assert!(err.source().and_then(|cause| cause.source()).is_some());
    }

    #[tokio::test]
    async fn transport_errors_count_as_not_found() {
        let geocoder = geocoder();
        let directions = FakeDirections::default();
        let stops = customers(&[("Bob", "timeout")]);

        let err = plan_route(&geocoder, &directions, "A", &stops)
            .await
            .unwrap_err();

        match err.cause {
            Cause::Resolution(resolution) => {
                assert_eq!(resolution.reason, Reason::NotFound);
                assert!(resolution.detail.is_some());
            }
            other => panic!("unexpected cause: {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_credential_is_reported_as_not_configured() {
        let geocoder = FakeGeocoder {
            unconfigured: true,
            ..geocoder()
        };
        let directions = FakeDirections::default();
        let stops = customers(&[("Bob", "Addr1")]);

        let err = plan_route(&geocoder, &directions, "A", &stops)
            .await
            .unwrap_err();

        assert!(err.is_not_configured());
        assert_eq!(err.stage, Stage::Origin);
    }

    #[tokio::test]
    async fn empty_selection_is_rejected_without_calls() {
        let geocoder = geocoder();
        let directions = FakeDirections::default();

        let err = plan_route(&geocoder, &directions, "A", &[]).await.unwrap_err();

        assert_eq!(err.cause, Cause::NoStops);
        assert_eq!(geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn malformed_service_order_is_a_directions_failure() {
        let geocoder = geocoder();
        let directions = FakeDirections {
            optimized_order: Some(vec![0, 1, 1, 2]),
            ..Default::default()
        };
        let stops = customers(&[("Bob", "Addr1"), ("Carol", "Addr2"), ("Dave", "Addr3")]);

        let err = plan_route(&geocoder, &directions, "A", &stops)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Directions);
    }

    #[tokio::test]
    async fn failed_generation_keeps_cached_plan() {
        let geocoder = geocoder();
        let directions = FakeDirections::default();
        let mut cache = RouteCache::new();

        let request = RouteRequest {
            origin_address: "A".into(),
            stops: customers(&[("Bob", "Addr1")]),
        };
        generate(&mut cache, &geocoder, &directions, &request)
            .await
            .unwrap();
        let before = cache.plan().cloned();

        let failing = FakeDirections {
            fail: true,
            ..Default::default()
        };
        let request = RouteRequest {
            origin_address: "A".into(),
            stops: customers(&[("Carol", "Addr2")]),
        };
        let err = generate(&mut cache, &geocoder, &failing, &request)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Directions);
        assert_eq!(cache.plan().cloned(), before);
        assert_eq!(
            cache.selection().map(|s| s.customers.clone()),
            Some(vec!["Bob".to_string()])
        );
    }

    #[tokio::test]
    async fn failed_origin_keeps_cached_plan_and_selection() {
        let geocoder = geocoder();
        let directions = FakeDirections::default();
        let mut cache = RouteCache::new();

        let request = RouteRequest {
            origin_address: "A".into(),
            stops: customers(&[("Bob", "Addr1"), ("Carol", "Addr2")]),
        };
        generate(&mut cache, &geocoder, &directions, &request)
            .await
            .unwrap();
        let plan = cache.plan().cloned();
        let selection = cache.selection().cloned();

        let request = RouteRequest {
            origin_address: "nowhere".into(),
            stops: customers(&[("Dave", "Addr3")]),
        };
        let err = generate(&mut cache, &geocoder, &directions, &request)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Origin);
        assert_eq!(cache.state(), RouteState::Ready);
        assert_eq!(cache.plan().cloned(), plan);
        assert_eq!(cache.selection().cloned(), selection);
    }

    #[tokio::test]
    async fn failed_origin_leaves_empty_cache_idle() {
        let geocoder = geocoder();
        let directions = FakeDirections::default();
        let mut cache = RouteCache::new();

        let request = RouteRequest {
            origin_address: "nowhere".into(),
            stops: customers(&[("Bob", "Addr1")]),
        };
        let err = generate(&mut cache, &geocoder, &directions, &request)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Origin);
        assert_eq!(cache.state(), RouteState::Idle);
    }
}
