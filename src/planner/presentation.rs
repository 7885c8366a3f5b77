use geo_types::LineString;
use serde::Serialize;

use crate::entities::{Coordinates, RoutePlan};

const MAPS_BASE: &str = "https://www.google.com/maps/dir/";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    Origin,
    Stop,
}

impl MarkerStyle {
    pub fn color(&self) -> &'static str {
        match self {
            Self::Origin => "green",
            Self::Stop => "blue",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub label: String,
    pub coordinates: Coordinates,
    pub style: MarkerStyle,
    pub color: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapView {
    pub center: Option<Coordinates>,
    pub markers: Vec<Marker>,
    /// Straight segments between waypoints, in visiting order.
    pub path: Vec<Coordinates>,
    /// Road geometry as returned by the directions service.
    pub geometry: LineString<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExternalLinks {
    pub google_maps: String,
    pub waze: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteView {
    pub summary: String,
    pub map: MapView,
    pub links: ExternalLinks,
}

pub fn render(plan: &RoutePlan) -> RouteView {
    RouteView {
        summary: summary_text(plan),
        map: map_view(plan),
        links: ExternalLinks {
            google_maps: google_maps_link(plan),
            waze: waze_link(plan),
        },
    }
}

pub fn summary_text(plan: &RoutePlan) -> String {
    format!(
        "Distância: {:.2} km | Tempo: {:.1} min",
        plan.total_distance_km, plan.total_duration_min
    )
}

pub fn google_maps_link(plan: &RoutePlan) -> String {
    let segments: Vec<String> = plan
        .waypoints
        .iter()
        .map(|w| w.coordinates.lat_lng())
        .collect();

    format!("{}{}", MAPS_BASE, segments.join("/"))
}

/// Navigation straight to the final stop.
pub fn waze_link(plan: &RoutePlan) -> Option<String> {
    plan.waypoints.last().map(|last| {
        format!(
            "https://waze.com/ul?ll={}&navigate=yes",
            last.coordinates.lat_lng()
        )
    })
}

fn map_view(plan: &RoutePlan) -> MapView {
    let markers = plan
        .waypoints
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let style = if i == 0 {
                MarkerStyle::Origin
            } else {
                MarkerStyle::Stop
            };

            Marker {
                label: w.label.clone(),
                coordinates: w.coordinates,
                style,
                color: style.color(),
            }
        })
        .collect();

    let path: Vec<Coordinates> = plan.waypoints.iter().map(|w| w.coordinates).collect();

    MapView {
        center: centroid(&path),
        markers,
        path,
        geometry: plan.geometry.clone(),
    }
}

fn centroid(points: &[Coordinates]) -> Option<Coordinates> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (lng, lat) = points
        .iter()
        .fold((0.0, 0.0), |(lng, lat), p| (lng + p.longitude, lat + p.latitude));

    Some(Coordinates::new(lng / n, lat / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Waypoint;

    fn plan(points: &[(&str, f64, f64)]) -> RoutePlan {
        RoutePlan {
            waypoints: points
                .iter()
                .map(|(label, lng, lat)| Waypoint {
                    label: label.to_string(),
                    coordinates: Coordinates::new(*lng, *lat),
                })
                .collect(),
            total_distance_km: 12.3456,
            total_duration_min: 25.04,
            geometry: LineString::new(vec![]),
            optimized: false,
        }
    }

    #[test]
    fn summary_uses_two_and_one_decimals() {
        let plan = plan(&[("Origem", 0.0, 0.0), ("Bob", 1.0, 1.0)]);

        assert_eq!(summary_text(&plan), "Distância: 12.35 km | Tempo: 25.0 min");
    }

    #[test]
    fn maps_link_lists_every_waypoint_latitude_first() {
        let plan = plan(&[
            ("Origem", -46.6, -23.5),
            ("Bob", -46.7, -23.6),
            ("Carol", -46.8, -23.7),
        ]);

        assert_eq!(
            google_maps_link(&plan),
            "https://www.google.com/maps/dir/-23.5,-46.6/-23.6,-46.7/-23.7,-46.8"
        );
    }

    #[test]
    fn waze_link_targets_last_stop_only() {
        let plan = plan(&[("Origem", -46.6, -23.5), ("Bob", -46.7, -23.6)]);

        assert_eq!(
            waze_link(&plan).as_deref(),
            Some("https://waze.com/ul?ll=-23.6,-46.7&navigate=yes")
        );
    }

    #[test]
    fn origin_marker_is_distinguished() {
        let view = render(&plan(&[("Origem", 0.0, 0.0), ("Bob", 2.0, 4.0)]));

        assert_eq!(view.map.markers[0].style, MarkerStyle::Origin);
        assert_eq!(view.map.markers[0].color, "green");
        assert_eq!(view.map.markers[1].style, MarkerStyle::Stop);
        assert_eq!(view.map.markers[1].label, "Bob");
        assert_eq!(view.map.path.len(), 2);
        assert_eq!(view.map.center, Some(Coordinates::new(1.0, 2.0)));
    }
}
